//! Ad-hoc HTTP request command
//!
//! Bypasses the directory client entirely: sends one raw request and routes
//! the response body through the JSON flattener for inspection. Failures
//! here are reported to the user and never escalate.

use colored::Colorize;
use log::{debug, warn};
use reqwest::Method;
use serde_json::Value;

use crate::cli::HttpRequestArgs;
use crate::error::Result;
use crate::output::json;

/// Run the http-request command
pub async fn run(args: &HttpRequestArgs) -> Result<()> {
    let method = match args.method.to_uppercase().as_str() {
        "GET" => Method::GET,
        "POST" => Method::POST,
        "PUT" => Method::PUT,
        "DELETE" => Method::DELETE,
        other => {
            eprintln!("{} {other}", "Unsupported HTTP method:".red());
            return Ok(());
        }
    };

    let client = reqwest::Client::new();
    let mut request = client.request(method.clone(), &args.url);

    for header in &args.headers {
        match header.split_once(':') {
            Some((key, value)) => request = request.header(key.trim(), value.trim()),
            None => warn!("Ignoring malformed header '{header}'"),
        }
    }

    if method == Method::POST || method == Method::PUT {
        request = request
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(args.body.clone().unwrap_or_default());
    }

    debug!("{method} {}", args.url);

    let response = match request.send().await {
        Ok(response) => response,
        Err(e) => {
            eprintln!("{} {e}", "Error occurred:".red());
            return Ok(());
        }
    };

    let status = response.status();
    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            eprintln!("{} {e}", "Error occurred:".red());
            return Ok(());
        }
    };

    if status.is_success() {
        println!("{}", "Request succeeded!".green());
    } else {
        println!(
            "{} {}",
            "Request failed with status code:".red(),
            status.to_string().yellow()
        );
    }

    match serde_json::from_str::<Value>(&body) {
        Ok(document) => {
            println!("{}", json::render_indented(&document)?);
            // The flat single-row view only accompanies successful bodies
            if status.is_success() {
                println!("{}", json::render_flat_table(&document));
            }
        }
        Err(_) if body.is_empty() => println!("(empty response body)"),
        Err(_) => {
            println!("{}", "Response body is not valid JSON.".red());
            println!("{body}");
        }
    }

    Ok(())
}
