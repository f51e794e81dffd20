//! Hosted checkout driven from the terminal
//!
//! The provider's checkout only runs in a browser, so the CLI writes a small
//! page that embeds the checkout script with the session options, opens it,
//! and reads the resulting payment id back from the terminal.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

use reqwest::blocking::Client;

use quizgate_core::config::CheckoutConfig;
use quizgate_core::{CheckoutError, CheckoutEvent, CheckoutOptions, CheckoutProvider};

const PAGE_FILENAME: &str = "quizgate-checkout.html";
const SCRIPT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct HostedCheckout<R> {
    script_url: String,
    page_dir: PathBuf,
    input: R,
    client: Client,
    open_browser: bool,
    loaded: bool,
}

impl HostedCheckout<io::StdinLock<'static>> {
    /// Checkout page in the temp dir, replies read from stdin.
    pub fn interactive(config: &CheckoutConfig) -> Result<Self, CheckoutError> {
        Self::new(config, std::env::temp_dir(), io::stdin().lock())
    }
}

impl<R: BufRead> HostedCheckout<R> {
    pub fn new(config: &CheckoutConfig, page_dir: PathBuf, input: R) -> Result<Self, CheckoutError> {
        let client = Client::builder()
            .timeout(SCRIPT_TIMEOUT)
            .build()
            .map_err(|e| CheckoutError::ScriptLoad(e.to_string()))?;

        Ok(Self {
            script_url: config.script_url.clone(),
            page_dir,
            input,
            client,
            open_browser: true,
            loaded: false,
        })
    }

    /// Only writes the page; the caller opens it.
    pub fn without_browser(mut self) -> Self {
        self.open_browser = false;
        self
    }

    pub fn page_path(&self) -> PathBuf {
        self.page_dir.join(PAGE_FILENAME)
    }

    fn read_reply(&mut self) -> Result<String, CheckoutError> {
        let mut line = String::new();
        self.input
            .read_line(&mut line)
            .map_err(|e| CheckoutError::Provider(format!("could not read reply: {e}")))?;
        Ok(line)
    }
}

impl<R: BufRead> CheckoutProvider for HostedCheckout<R> {
    fn load(&mut self) -> Result<(), CheckoutError> {
        if self.loaded {
            return Ok(());
        }

        let response = self
            .client
            .get(&self.script_url)
            .send()
            .map_err(|e| CheckoutError::ScriptLoad(e.to_string()))?;
        if !response.status().is_success() {
            return Err(CheckoutError::ScriptLoad(format!(
                "{} returned HTTP {}",
                self.script_url,
                response.status().as_u16()
            )));
        }

        tracing::debug!(url = %self.script_url, "checkout script reachable");
        self.loaded = true;
        Ok(())
    }

    fn open(&mut self, options: &CheckoutOptions) -> Result<CheckoutEvent, CheckoutError> {
        let page = render_page(options, &self.script_url)?;
        let path = self.page_path();
        std::fs::write(&path, page)
            .map_err(|e| CheckoutError::Provider(format!("write {}: {e}", path.display())))?;

        if self.open_browser {
            if let Err(e) = open::that(&path) {
                tracing::warn!(error = %e, "could not open browser");
                eprintln!("  Could not open a browser. Open this file manually:");
            }
        }
        eprintln!("  Checkout page: {}", path.display());
        eprintln!("  Complete the payment, then paste the payment id (pay_...) below.");
        eprint!("  Payment id (leave empty to cancel): ");
        io::stderr()
            .flush()
            .map_err(|e| CheckoutError::Provider(format!("flush prompt: {e}")))?;

        let reply = self.read_reply()?;
        Ok(parse_reply(&reply))
    }
}

/// Interprets what the buyer typed after the checkout closed.
pub fn parse_reply(reply: &str) -> CheckoutEvent {
    let reply = reply.trim();
    if reply.is_empty() {
        return CheckoutEvent::Dismissed;
    }

    let is_reference = reply.starts_with("pay_")
        && reply.len() > "pay_".len()
        && reply.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if is_reference {
        CheckoutEvent::Success {
            payment_id: reply.to_string(),
        }
    } else {
        CheckoutEvent::Failed {
            code: None,
            description: format!("`{reply}` is not a payment id"),
        }
    }
}

/// Standalone HTML page that opens the provider checkout with `options`.
pub fn render_page(options: &CheckoutOptions, script_url: &str) -> Result<String, CheckoutError> {
    let options_json = serde_json::to_string(options)
        .map_err(|e| CheckoutError::Provider(format!("encode options: {e}")))?
        .replace("</", "<\\/");
    let script_url = script_url.replace('"', "%22");

    Ok(format!(
        r#"<!doctype html>
<html>
<head><meta charset="utf-8"><title>{title}</title></head>
<body>
<p id="status">Opening checkout...</p>
<script src="{script_url}"></script>
<script>
  var options = {options_json};
  var status = document.getElementById("status");
  options.handler = function (response) {{
    status.innerText = "Payment id: " + response.razorpay_payment_id + " (paste this into the terminal)";
  }};
  options.modal = {{ ondismiss: function () {{ status.innerText = "Payment cancelled. Press Enter in the terminal."; }} }};
  var checkout = new Razorpay(options);
  checkout.on("payment.failed", function (response) {{
    status.innerText = "Payment failed: " + response.error.description;
  }});
  checkout.open();
</script>
</body>
</html>
"#,
        title = html_escape(&options.description),
    ))
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
