//! Interactive chat application for conversing through the Qwen bridge.
//!
//! This binary provides a REPL over a local bridge server that drives the
//! actual chat UI in a headless browser.
//!
//! # Usage
//!
//! ```bash
//! # Basic usage with the default local bridge
//! qwintus-chat
//!
//! # Point at a different bridge
//! qwintus-chat --url http://127.0.0.1:5000/api/
//!
//! # Start with an agent preset and web search enabled
//! qwintus-chat --agent "Code Assistant" --search
//!
//! # Disable colors (useful for piping output)
//! qwintus-chat --no-color
//! ```
//!
//! # Commands
//!
//! While chatting, you can use slash commands:
//! - `/help` - Show available commands
//! - `/new` - Start a new conversation
//! - `/image <prompt>` - Generate an image
//! - `/agent <name>` - Select an agent preset for the next send
//! - `/stats` - Show session statistics
//! - `/quit` - Exit the application

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use qwintus::QwenBridge;
use qwintus::chat::{
    ChatArgs, ChatCommand, ChatConfig, ChatSession, SessionStats, TranscriptRenderer, help_text,
    parse_command,
};
use qwintus::types::Attachment;

/// Prompt sent to every model during a probe.
const PROBE_PROMPT: &str = "Hello, can you respond briefly?";

/// Main entry point for the qwintus-chat application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, _) = ChatArgs::from_command_line_relaxed("qwintus-chat [OPTIONS]");
    let config = if let Some(path) = args.config.clone() {
        ChatConfig::load(&path)?.apply_args(&args)
    } else {
        ChatConfig::from(args)
    };
    let use_color = config.use_color;

    let url = config
        .url
        .clone()
        .or_else(|| std::env::var("QWINTUS_BRIDGE_URL").ok());
    let client = QwenBridge::with_options(url, config.auth_url.clone(), config.timeout())?;
    let base_url = client.base_url().to_string();

    let mut session = ChatSession::new(client);
    session.subscribe(Box::new(TranscriptRenderer::with_color(use_color)));
    let session = session;
    let renderer = TranscriptRenderer::with_color(use_color);

    if let Some(agent) = &config.agent {
        session.select_agent(Some(agent.clone()));
    }
    session.set_web_search(config.web_search);
    session.set_thinking_mode(config.thinking_mode);

    let mut rl = DefaultEditor::new()?;

    // Requests cannot be canceled once dispatched; a ctrl-C mid-request
    // only sets this flag so the REPL survives the signal.
    let interrupted = Arc::new(AtomicBool::new(false));
    let interrupted_clone = interrupted.clone();
    ctrlc::set_handler(move || {
        interrupted_clone.store(true, Ordering::Relaxed);
    })?;

    println!("Qwen Bridge Chat ({})", base_url);
    println!("Type /help for commands, /quit to exit\n");

    futures::join!(session.refresh_model_metadata(), session.refresh_history());

    loop {
        interrupted.store(false, Ordering::Relaxed);

        let readline = rl.readline("You: ");

        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                // Check for slash commands
                if let Some(cmd) = parse_command(line) {
                    match cmd {
                        ChatCommand::Quit => {
                            println!("Goodbye!");
                            break;
                        }
                        ChatCommand::New => {
                            if !session.start_new_session() {
                                renderer
                                    .print_error("A request is still pending; try again shortly.");
                            }
                        }
                        ChatCommand::Image(prompt) => {
                            // Failure is already rendered inline by the observer.
                            let _ = session.request_image(&prompt).await;
                            note_interrupt(&interrupted, &renderer);
                        }
                        ChatCommand::Agent(agent) => {
                            match &agent {
                                Some(name) => {
                                    renderer.print_info(&format!("Agent set to: {name}"))
                                }
                                None => renderer.print_info("Agent selection cleared."),
                            }
                            session.select_agent(agent);
                        }
                        ChatCommand::Search(enabled) => {
                            session.set_web_search(enabled);
                            renderer.print_info(if enabled {
                                "Web search enabled."
                            } else {
                                "Web search disabled."
                            });
                        }
                        ChatCommand::Thinking(enabled) => {
                            session.set_thinking_mode(enabled);
                            renderer.print_info(if enabled {
                                "Thinking mode enabled."
                            } else {
                                "Thinking mode disabled."
                            });
                        }
                        ChatCommand::Attach(path) => match Attachment::from_path(&path).await {
                            Ok(attachment) => {
                                renderer
                                    .print_info(&format!("Attached: {}", attachment.file_name));
                                session.attach(attachment);
                            }
                            Err(err) => renderer.print_error(&err.to_string()),
                        },
                        ChatCommand::Detach => {
                            session.clear_attachments();
                            renderer.print_info("Attachments cleared.");
                        }
                        ChatCommand::Model => {
                            session.refresh_model_metadata().await;
                        }
                        ChatCommand::Models => {
                            session.refresh_model_metadata().await;
                            let models = session.available_models();
                            if models.is_empty() {
                                renderer.print_info("No models reported.");
                            } else {
                                for name in models {
                                    println!("    {name}");
                                }
                            }
                        }
                        ChatCommand::History => {
                            session.refresh_history().await;
                        }
                        ChatCommand::Probe(mut models) => {
                            if models.is_empty() {
                                models = session.available_models();
                            }
                            if models.is_empty() {
                                renderer.print_error(
                                    "No models to probe; run /models first or name them.",
                                );
                                continue;
                            }
                            match session.probe_models(PROBE_PROMPT, models).await {
                                Ok(Some(_)) => {}
                                Ok(None) => renderer.print_error(
                                    "A request is still pending; try again shortly.",
                                ),
                                Err(err) => renderer.print_error(&err.to_string()),
                            }
                            note_interrupt(&interrupted, &renderer);
                        }
                        ChatCommand::SaveTranscript(path) => {
                            match session.save_transcript_to(&path) {
                                Ok(_) => {
                                    renderer.print_info(&format!("Transcript saved to {}", path))
                                }
                                Err(err) => renderer
                                    .print_error(&format!("Failed to save transcript: {}", err)),
                            }
                        }
                        ChatCommand::Stats => {
                            print_stats(&session.stats());
                        }
                        ChatCommand::Help => {
                            for line in help_text().lines() {
                                println!("    {}", line);
                            }
                        }
                        ChatCommand::Invalid(message) => {
                            renderer.print_error(&message);
                        }
                    }
                    continue;
                }

                // Regular message - send through the bridge. Failure is
                // already rendered inline by the observer.
                let _ = session.submit_message(line).await;
                note_interrupt(&interrupted, &renderer);
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C at prompt - soft interrupt
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D - exit
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                renderer.print_error(&format!("Input error: {}", err));
                break;
            }
        }
    }

    Ok(())
}

fn note_interrupt(interrupted: &AtomicBool, renderer: &TranscriptRenderer) {
    if interrupted.swap(false, Ordering::Relaxed) {
        renderer.print_info("(requests cannot be canceled once dispatched)");
    }
}

fn print_stats(stats: &SessionStats) {
    println!("    Session Statistics:");
    match &stats.session_id {
        Some(id) => println!("      Conversation: {}", id),
        None => println!("      Conversation: (none)"),
    }
    println!(
        "      Pending request: {}",
        if stats.pending { "yes" } else { "no" }
    );
    println!("      Messages: {}", stats.message_count);
    println!("      Requests: {}", stats.request_count);
    println!("      Model: {}", stats.model);
    println!("      Models available: {}", stats.available_models);
    println!("      History entries: {}", stats.history_entries);
    println!("      Started at: {}", stats.started_at);
}
