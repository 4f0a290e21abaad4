//! Console driver for the PrepMate core.
//!
//! This is the "presentation collaborator": it registers a user, runs the
//! ask/answer loop against the library, and prints the summary. All logic
//! lives in the library; anything here could be swapped for a web UI.

use anyhow::Result;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

use prepmate::{
    AIProvider, Domain, InterviewManager, QuestionCatalog, RemotePreference, ScoringConfig,
    ScoringEngine, SqliteStore, UserProfile,
};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() >= 2 && args[1] == "validate" {
        return validate_credentials(args.get(2).map(String::as_str)).await;
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    println!("=== PrepMate Interview Practice ===");
    let name = prompt(&mut lines, "Name: ")?;
    if name.is_empty() {
        anyhow::bail!("a name is required to start a session");
    }
    let email = prompt(&mut lines, "Email: ")?;
    let domain = loop {
        let raw = prompt(&mut lines, "Domain (hr/technical/mixed): ")?;
        match Domain::from_str(raw.trim().to_lowercase().as_str()) {
            Some(domain) => break domain,
            None => println!("Please enter one of: hr, technical, mixed."),
        }
    };

    let config = ScoringConfig::from_env();
    let catalog = if std::path::Path::new("questions.json").exists() {
        QuestionCatalog::load("questions.json")
    } else {
        QuestionCatalog::builtin()
    };
    let store = Arc::new(SqliteStore::open("prepmate.db")?);
    let manager = InterviewManager::new(catalog, store, ScoringEngine::new(config));

    let user = UserProfile {
        name,
        email,
        domain,
    };
    let session_id = manager.start(&user)?;
    println!("Started session {} for {}.", session_id, user.name);
    println!("Press Enter on an empty answer to finish.\n");

    loop {
        let question = match manager.next_question(domain) {
            Some(question) => question,
            None => {
                println!("No questions available for this domain.");
                break;
            }
        };
        println!("Question: {}", question);
        let answer = prompt(&mut lines, "Your answer: ")?;
        if answer.is_empty() {
            break;
        }

        let result = manager
            .submit(session_id, &question, &answer, RemotePreference::Auto)
            .await?;
        println!("Score: {:.1}/10", result.score);
        println!("Feedback: {}\n", result.feedback);
    }

    manager.end(session_id)?;
    let summary = manager.summary(session_id)?;
    println!("\n=== Session Summary ===");
    println!(
        "{} answers, average score {:.1}/10",
        summary.response_count, summary.average_score
    );
    for (i, response) in summary.responses.iter().enumerate() {
        println!("{}. [{:.1}] {}", i + 1, response.score, response.question);
    }

    Ok(())
}

async fn validate_credentials(provider: Option<&str>) -> Result<()> {
    let Some(name) = provider else {
        anyhow::bail!("usage: prepmate validate <openai|pollinations>");
    };
    let provider = AIProvider::from_str(name)
        .ok_or_else(|| prepmate::ScoringError::UnknownProvider(name.to_string()))?;

    let engine = prepmate::ScoringEngine::new(ScoringConfig::from_env());
    match engine.validate_credentials(provider).await {
        Ok(reply) => println!("{} validation succeeded: {}", provider.as_str(), reply),
        Err(err) => println!("{} validation failed: {}", provider.as_str(), err),
    }
    Ok(())
}

fn prompt(
    lines: &mut std::io::Lines<io::StdinLock<'_>>,
    label: &str,
) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;
    match lines.next() {
        Some(line) => Ok(line?.trim().to_string()),
        None => Ok(String::new()),
    }
}
