use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use omniai_client::app::App;
use omniai_client::auth::SessionContext;
use omniai_client::image;
use omniai_client::models::Config;
use omniai_client::options::{ArtMood, ArtStyle, Subject, Tone, WritingMode};
use std::io::Write as _;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "omniai")]
#[command(about = "AI chat, writing help, homework solving and art from the terminal")]
struct CliArgs {
    /// Sign in with this email before running the command.
    #[arg(long, global = true)]
    email: Option<String>,

    /// Password for --email.
    #[arg(long, global = true, env = "OMNIAI_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Interactive chat. One message per line, `/quit` to leave.
    Chat,

    /// Rewrite, summarize, expand, fix or re-tone text.
    Write {
        #[arg(long, value_enum, default_value_t = WritingMode::Rewrite)]
        mode: WritingMode,

        /// Only used with `--mode tone`.
        #[arg(long, value_enum, default_value_t = Tone::Formal)]
        tone: Tone,

        /// Text to process; read from stdin when omitted.
        text: Option<String>,
    },

    /// Solve a homework problem from text and/or an image.
    Homework {
        #[arg(long, value_enum, default_value_t = Subject::Math)]
        subject: Subject,

        /// Ask for the final answer only.
        #[arg(long)]
        no_steps: bool,

        /// Photo or screenshot of the problem.
        #[arg(long, value_name = "PATH")]
        image: Option<PathBuf>,

        question: Option<String>,
    },

    /// Generate an image from a description.
    Art {
        prompt: String,

        #[arg(long, value_enum, default_value_t = ArtStyle::Realistic)]
        style: ArtStyle,

        #[arg(long, value_enum, default_value_t = ArtMood::Vibrant)]
        mood: ArtMood,

        /// Where to save the image; the extension picks the format.
        #[arg(long, short, default_value = "art.png")]
        output: PathBuf,
    },

    /// Account management.
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
}

#[derive(Debug, Subcommand)]
enum AuthAction {
    /// Create an account for --email.
    SignUp,
    /// Sign in with --email and show the current user.
    Whoami,
}

fn credentials<'a>(
    email: Option<&'a str>,
    password: Option<&'a str>,
) -> Result<(&'a str, &'a str)> {
    match (email, password) {
        (Some(email), Some(password)) => Ok((email, password)),
        (None, _) => bail!("--email is required"),
        (Some(_), None) => bail!("--password or OMNIAI_PASSWORD is required with --email"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "omniai_client=info,omniai=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();

    match run(args).await {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}

async fn run(args: CliArgs) -> Result<()> {
    let config = Config::from_env()?;

    // Reuse one HTTP connection pool across all clients.
    let http_client = reqwest::Client::new();
    let auth = App::auth_client(&config, http_client.clone());
    let mut session = SessionContext::new();

    let signing_up = matches!(
        args.command,
        Command::Auth {
            action: AuthAction::SignUp
        }
    );
    if args.email.is_some() && !signing_up {
        let (email, password) = credentials(args.email.as_deref(), args.password.as_deref())?;
        session.sign_in(&auth, email, password).await?;
    }

    let mut app = App::new(&config, http_client, Box::new(auth), session);
    let outcome = dispatch(&mut app, args).await;

    // Sessions are not persisted, so revoke the token before exiting.
    if let Err(e) = app.sign_out().await {
        warn!("Failed to sign out: {}", e);
    }

    outcome
}

async fn dispatch(app: &mut App, args: CliArgs) -> Result<()> {
    let CliArgs {
        email,
        password,
        command,
    } = args;

    match command {
        Command::Chat => chat(app).await,
        Command::Write { mode, tone, text } => {
            let text = match text {
                Some(text) => text,
                None => read_stdin().await?,
            };
            let output = app.writing().process(mode, tone, &text).await?;
            println!("{}", output);
            Ok(())
        }
        Command::Homework {
            subject,
            no_steps,
            image,
            question,
        } => {
            let image_data = match &image {
                Some(path) => Some(tokio::fs::read(path).await?),
                None => None,
            };
            let solution = app
                .homework()
                .solve(
                    subject,
                    !no_steps,
                    question.as_deref().unwrap_or_default(),
                    image_data.as_deref(),
                )
                .await?;
            println!("{}", solution);
            Ok(())
        }
        Command::Art {
            prompt,
            style,
            mood,
            output,
        } => {
            let mut studio = app.art();
            let generation = studio.generate(&prompt, style, mood).await?;
            image::save(&generation.image, &output)?;
            println!("{}", output.display());
            Ok(())
        }
        Command::Auth {
            action: AuthAction::Whoami,
        } => {
            let session = app.session();
            match (session.current_user_email(), session.current_user_id()) {
                (email, Some(id)) => {
                    println!("{} ({})", email.unwrap_or("<no email>"), id);
                    Ok(())
                }
                _ => bail!("not signed in; pass --email"),
            }
        }
        Command::Auth {
            action: AuthAction::SignUp,
        } => {
            let (email, password) = credentials(email.as_deref(), password.as_deref())?;
            app.sign_up(email, password).await?;
            if app.session().is_authenticated() {
                println!("Account created for {}", email);
            } else {
                println!("Account created; check {} for a confirmation link", email);
            }
            Ok(())
        }
    }
}

async fn chat(app: &App) -> Result<()> {
    let mut session = app.chat();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    info!("Chat started; type /quit to leave");
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim() == "/quit" {
            break;
        }

        if let Some(reply) = session.submit(&line).await {
            println!("{}\n", reply.content);
        }
    }

    Ok(())
}

async fn read_stdin() -> Result<String> {
    let mut text = String::new();
    tokio::io::stdin().read_to_string(&mut text).await?;
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_homework() {
        let args = CliArgs::try_parse_from([
            "omniai",
            "homework",
            "--subject",
            "physics",
            "--no-steps",
            "What is g?",
        ])
        .unwrap();

        match args.command {
            Command::Homework {
                subject,
                no_steps,
                question,
                image,
            } => {
                assert_eq!(subject, Subject::Physics);
                assert!(no_steps);
                assert_eq!(question.as_deref(), Some("What is g?"));
                assert!(image.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_parses_art_enums() {
        let args = CliArgs::try_parse_from([
            "omniai",
            "art",
            "a castle",
            "--style",
            "oil-painting",
            "--mood",
            "mysterious",
        ])
        .unwrap();

        match args.command {
            Command::Art {
                style, mood, output, ..
            } => {
                assert_eq!(style, ArtStyle::OilPainting);
                assert_eq!(mood, ArtMood::Mysterious);
                assert_eq!(output, PathBuf::from("art.png"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_credentials_require_email() {
        assert!(credentials(None, Some("pw")).is_err());
        assert!(credentials(Some("a@example.com"), None).is_err());
        assert_eq!(
            credentials(Some("a@example.com"), Some("pw")).unwrap(),
            ("a@example.com", "pw")
        );
    }
}
