//! Interactive chat session over stdin/stdout.

use std::error::Error;
use std::io::{self, BufRead, Write};

use crate::api::AssistantClient;
use crate::auth::{CredentialStore, KeyringCredentialStore, TOKEN_ENV_VAR};
use crate::core::config::Config;
use crate::core::conversation::ConversationController;
use crate::ui;

pub async fn run_chat(base_url_override: Option<String>) -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;
    let base_url = base_url_override.unwrap_or_else(|| config.base_url().to_string());

    let credentials = KeyringCredentialStore::new();
    if credentials.get()?.is_none() {
        eprintln!("No session credential found. Run 'merchat auth' first, or set {TOKEN_ENV_VAR}.");
        std::process::exit(1);
    }

    let transport = AssistantClient::new(base_url.clone());
    let mut controller = ConversationController::new(Box::new(transport), Box::new(credentials));

    println!("Connected to {base_url}.");
    println!("Ask about products and suppliers. /quit to exit.");

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim_end_matches(['\r', '\n']);
        if line == "/quit" || line == "/exit" {
            break;
        }

        controller.set_input(line);
        let already_shown = controller.transcript().len();
        controller.submit().await;

        for turn in controller.transcript().all().iter().skip(already_shown) {
            for out in ui::turn_lines(turn) {
                println!("{out}");
            }
        }
    }

    Ok(())
}
