mod cli;
mod config;
mod error;
mod generator;
mod session;
mod core {
    pub mod export;
    pub mod post;
}
mod ai {
    pub mod client;
    pub mod prompts;
}

use ai::client::OpenAiClient;
use chrono::Local;
use cli::{CliCommand, Field, parse_input};
use colored::*;
use config::Config;
use crate::core::export;
use crate::core::post::Credential;
use dotenv::dotenv;
use error::PostGenError;
use generator::PostGenerator;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use session::Session;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env();
    let client = OpenAiClient::new(&config)?;
    log::info!("Using model {} via {}", client.model(), config.api_base);
    let generator = PostGenerator::new(Arc::new(client));

    let mut session = Session::new();
    let mut rl = DefaultEditor::new()?;

    println!("{}", "📝 LinkedIn Post Generator".bold().blue());
    println!("{}", cli::HELP.dimmed());

    loop {
        let readline = rl.readline(&format!("{} ", "❯".blue().bold()));

        let line = match readline {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => {
                println!("\n{}", "Goodbye!".dimmed());
                break;
            }
            Err(e) => {
                eprintln!("Input error: {e:?}");
                break;
            }
        };

        let Some(command) = parse_input(&line) else {
            continue;
        };
        if !command.is_secret() {
            let _ = rl.add_history_entry(&line);
        }

        match command {
            CliCommand::Quit => break,
            CliCommand::Help => println!("{}", cli::HELP),
            CliCommand::Form => print_form(&session),
            CliCommand::SetField(field, value) => {
                let slot = match field {
                    Field::Topic => &mut session.form.topic,
                    Field::Industry => &mut session.form.industry,
                    Field::Expertise => &mut session.form.expertise,
                    Field::Story => &mut session.form.story,
                };
                *slot = value;
                println!("{} {} updated", "●".dimmed(), field.label());
            }
            CliCommand::SetKey(secret) => {
                session.set_credential(Credential::new(secret));
                println!("{} API key set for this session", "●".dimmed());
            }
            CliCommand::Generate => run_generation(&mut session, &generator).await,
            CliCommand::Show => match session.post() {
                Some(post) => println!("{}", export::render(post)),
                None => println!("{}", "No post yet. Use /generate.".dimmed()),
            },
            CliCommand::Edit => edit_post(&mut session, &mut rl)?,
            CliCommand::Download => match session.post() {
                Some(post) => {
                    let file = export::download(post, &Local::now());
                    match file.save_into(&config.output_dir) {
                        Ok(saved) => {
                            println!("{} Saved {} ({})", "💾".green(), saved.path.display(), file.mime);
                            if saved.replaced {
                                println!("{}", "● Replaced an earlier export from the same minute".yellow());
                            }
                        }
                        Err(e) => report(&e),
                    }
                }
                None => println!("{}", "No post to download yet.".dimmed()),
            },
            CliCommand::Link(target) => {
                if session.post().is_some() {
                    println!("{}: {}", target.label(), target.url().underline());
                } else {
                    println!("{}", "Generate a post first.".dimmed());
                }
            }
            CliCommand::Unknown(input) => {
                println!("{} Unknown command '{input}'. Type /help.", "?".yellow());
            }
        }
    }

    log::info!("Session {} ended", session.id());
    Ok(())
}

async fn run_generation(session: &mut Session, generator: &PostGenerator) {
    print!("{}", "Creating your LinkedIn post".dimmed());
    let _ = std::io::stdout().flush();

    let outcome = session.generate_until(generator, ctrl_c_with_progress()).await;
    println!();

    match outcome {
        Ok(Some(post)) => println!("{}", export::render(post)),
        Ok(None) => println!("{}", "● Generation cancelled".dimmed()),
        Err(e) => {
            report(&e);
            session.dismiss_error();
        }
    }
}

/// Resolves on Ctrl-C, printing a progress dot every half second until then.
async fn ctrl_c_with_progress() {
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut ticker = tokio::time::interval(Duration::from_millis(500));
    ticker.tick().await;
    loop {
        tokio::select! {
            _ = &mut ctrl_c => return,
            _ = ticker.tick() => {
                print!("{}", ".".dimmed());
                let _ = std::io::stdout().flush();
            }
        }
    }
}

fn edit_post(session: &mut Session, rl: &mut DefaultEditor) -> Result<(), ReadlineError> {
    let Some(post) = session.post() else {
        println!("{}", "No post to edit yet.".dimmed());
        return Ok(());
    };
    println!("{}", export::render(post));
    println!(
        "{}",
        "Enter the new text. A line with a single '.' finishes; finishing straight away keeps the post."
            .dimmed()
    );

    let mut lines = Vec::new();
    loop {
        match rl.readline("… ") {
            Ok(line) if line.trim() == "." => break,
            Ok(line) => lines.push(line),
            Err(ReadlineError::Interrupted) => {
                println!("{}", "● Edit discarded".dimmed());
                return Ok(());
            }
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e),
        }
    }

    if lines.is_empty() {
        println!("{}", "● Post unchanged".dimmed());
        return Ok(());
    }
    match session.edit_post(lines.join("\n")) {
        Ok(_) => println!("{}", "● Post updated".dimmed()),
        Err(e) => report(&e),
    }
    Ok(())
}

fn print_form(session: &Session) {
    let form = &session.form;
    let show = |value: &str| {
        if value.trim().is_empty() {
            "—".dimmed().to_string()
        } else {
            value.to_string()
        }
    };
    println!("{}", "Post Details".bold());
    println!("  {:<28} {}", Field::Topic.label(), show(&form.topic));
    println!("  {:<28} {}", Field::Industry.label(), show(&form.industry));
    println!("  {:<28} {}", Field::Expertise.label(), show(&form.expertise));
    println!("  {:<28} {}", Field::Story.label(), show(&form.story));
    let key = if session.has_credential() { "set" } else { "missing" };
    println!("  {:<28} {}", "OpenAI API Key", key);
    println!("  {:<28} {:?}", "Status", session.state());
}

fn report(e: &PostGenError) {
    eprintln!("{} {}", "✗".red().bold(), e.to_string().red());
}
