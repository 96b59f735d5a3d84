//! Endpoint discovery probe.
//!
//! Walks a fixed list of candidate origin endpoints through the gateway and
//! prints what each one answers. Useful when the origin's route surface has
//! drifted and login or uploads start failing.

use clap::Parser;
use serde_json::json;

#[derive(Parser)]
#[command(name = "probe")]
#[command(about = "Probe origin endpoints through the EduNexus gateway", long_about = None)]
struct Cli {
    /// Gateway base URL.
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    /// Hit the origin directly instead of going through /api/proxy.
    #[arg(long)]
    direct: bool,
}

const ENDPOINTS: &[(&str, &str)] = &[
    ("POST", "/auth/login"),
    ("POST", "/auth/register"),
    ("GET", "/"),
    ("GET", "/health"),
    ("GET", "/academic/subjects"),
    ("POST", "/admin/material"),
    ("POST", "/ai/explain"),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let probe_body = json!({
        "name": "Test User",
        "email": "test@test.com",
        "password": "test123",
        "role": "STUDENT",
        "department": "CS",
    });

    for (method, path) in ENDPOINTS {
        let target = if cli.direct {
            format!("{}{}", cli.url.trim_end_matches('/'), path)
        } else {
            format!("{}/api/proxy{}", cli.url.trim_end_matches('/'), path)
        };

        let request = match *method {
            "POST" => client.post(&target).json(&probe_body),
            _ => client.get(&target),
        };

        match request.send().await {
            Ok(res) => {
                let status = res.status();
                let content_type = res
                    .headers()
                    .get(reqwest::header::CONTENT_TYPE)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("-")
                    .to_string();
                let body = res.text().await.unwrap_or_default();
                let snippet: String = body.chars().take(200).collect();
                println!("{method} {path} -> {status} [{content_type}] {snippet}");
            }
            Err(err) => {
                println!("{method} {path} -> unreachable ({err})");
            }
        }
    }

    Ok(())
}
