use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, Result};
use dotenvy::dotenv;
use tracing::{info, warn};

mod config;
mod llm;
mod output;
mod styles;
mod utils;

use llm::media::load_source_image;
use llm::{GenerationClient, GenerationRequest};
use utils::logging::init_logging;

fn usage() -> &'static str {
    "Usage:\n  pfp_styler styles\n  pfp_styler generate --style <id> --input <path> [--output <path>] [--custom <text>]"
}

#[derive(Debug)]
struct GenerateArgs {
    style_id: String,
    input: PathBuf,
    output: Option<PathBuf>,
    custom_text: Option<String>,
}

fn parse_generate_args(args: &[String]) -> Result<GenerateArgs> {
    let mut style_id: Option<String> = None;
    let mut input: Option<PathBuf> = None;
    let mut output: Option<PathBuf> = None;
    let mut custom_text: Option<String> = None;

    let mut index = 2;
    while index < args.len() {
        match args[index].as_str() {
            "--style" => {
                index += 1;
                let value = args
                    .get(index)
                    .ok_or_else(|| anyhow!("Missing value for --style"))?;
                style_id = Some(value.clone());
            }
            "--input" => {
                index += 1;
                let value = args
                    .get(index)
                    .ok_or_else(|| anyhow!("Missing value for --input"))?;
                input = Some(PathBuf::from(value));
            }
            "--output" => {
                index += 1;
                let value = args
                    .get(index)
                    .ok_or_else(|| anyhow!("Missing value for --output"))?;
                output = Some(PathBuf::from(value));
            }
            "--custom" => {
                index += 1;
                let value = args
                    .get(index)
                    .ok_or_else(|| anyhow!("Missing value for --custom"))?;
                custom_text = Some(value.clone());
            }
            other => return Err(anyhow!("Unknown argument: {other}")),
        }
        index += 1;
    }

    let style_id = style_id.ok_or_else(|| anyhow!("--style is required"))?;
    if styles::get(&style_id).is_none() {
        let valid: Vec<&str> = styles::all().iter().map(|style| style.id).collect();
        return Err(anyhow!(
            "Unknown style '{}'. Valid styles: {}",
            style_id,
            valid.join(", ")
        ));
    }
    let input = input.ok_or_else(|| anyhow!("--input is required"))?;

    Ok(GenerateArgs {
        style_id,
        input,
        output,
        custom_text,
    })
}

fn print_styles() {
    for style in styles::all() {
        println!("{:<10}  {}", style.id, style.label);
        println!("{:<10}  {}", "", style.description);
    }
}

async fn run_generate(args: GenerateArgs) -> Result<()> {
    let client = GenerationClient::from_config();
    if !client.is_configured() {
        warn!("GEMINI_API_KEY is not set; generation will be refused");
    }

    let source_image = load_source_image(&args.input)?;
    info!(
        "Generating '{}' style for {} ({} bytes)",
        args.style_id,
        args.input.display(),
        source_image.len()
    );

    let request = GenerationRequest {
        style_id: args.style_id.clone(),
        source_image,
        custom_text: args.custom_text,
    };

    let image = match client.generate(&request).await {
        Ok(image) => image,
        Err(err) => {
            warn!(category = ?err.category(), "generation failed");
            return Err(anyhow!(err.to_string()));
        }
    };

    let path = args
        .output
        .unwrap_or_else(|| output::default_output_path(&args.style_id));
    output::save_image(&image, &path)?;
    println!("Saved styled portrait to {}", path.display());
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    let _logging_guards = init_logging();

    let args: Vec<String> = env::args().collect();
    match args.get(1).map(String::as_str) {
        Some("styles") => {
            print_styles();
            ExitCode::SUCCESS
        }
        Some("generate") => {
            let parsed = match parse_generate_args(&args) {
                Ok(parsed) => parsed,
                Err(err) => {
                    eprintln!("{err}");
                    eprintln!("{}", usage());
                    return ExitCode::FAILURE;
                }
            };
            match run_generate(parsed).await {
                Ok(()) => ExitCode::SUCCESS,
                Err(err) => {
                    eprintln!("{err}");
                    ExitCode::FAILURE
                }
            }
        }
        _ => {
            eprintln!("{}", usage());
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|part| part.to_string()).collect()
    }

    #[test]
    fn generate_args_require_style_and_input() {
        let err = parse_generate_args(&argv(&["pfp_styler", "generate"])).unwrap_err();
        assert!(err.to_string().contains("--style"));

        let err = parse_generate_args(&argv(&["pfp_styler", "generate", "--style", "wif"]))
            .unwrap_err();
        assert!(err.to_string().contains("--input"));
    }

    #[test]
    fn generate_args_parse_all_flags() {
        let parsed = parse_generate_args(&argv(&[
            "pfp_styler",
            "generate",
            "--style",
            "bonk",
            "--input",
            "me.png",
            "--output",
            "out/bonk.png",
            "--custom",
            "more sparkles",
        ]))
        .unwrap();

        assert_eq!(parsed.style_id, "bonk");
        assert_eq!(parsed.input, PathBuf::from("me.png"));
        assert_eq!(parsed.output, Some(PathBuf::from("out/bonk.png")));
        assert_eq!(parsed.custom_text.as_deref(), Some("more sparkles"));
    }

    #[test]
    fn generate_args_reject_unknown_styles_with_the_valid_list() {
        let err = parse_generate_args(&argv(&[
            "pfp_styler",
            "generate",
            "--style",
            "doge",
            "--input",
            "me.png",
        ]))
        .unwrap_err();

        let text = err.to_string();
        assert!(text.contains("Unknown style 'doge'"));
        assert!(text.contains("wif"));
        assert!(text.contains("fartcoin"));
    }
}
