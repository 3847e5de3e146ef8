use once_cell::sync::Lazy;
use reqwest::Client;

// No client-level timeout: generation calls may legitimately run for minutes
// and deadlines belong to the caller.
static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .build()
        .expect("Failed to build HTTP client")
});

pub fn get_http_client() -> &'static Client {
    &HTTP_CLIENT
}
