//! Issue and inspect signing tokens
//!
//! Reads the token secret from `ESIGN_TOKEN_SECRET` (and optionally
//! `ESIGN_TOKEN_SALT`).
//!
//! Usage:
//!   cargo run --bin esign_token -- issue --subject u1 --email a@x.com [--purpose contract_signing] [--hours 168]
//!   cargo run --bin esign_token -- inspect <token> [--purpose contract_signing]
//!   cargo run --bin esign_token -- notice [--jurisdiction eu|us|generic]

use esign_oxide::compliance::{compliance_notice, Jurisdiction};
use esign_oxide::config::TokenConfig;
use esign_oxide::tokens::{TokenPolicy, TokenPurpose};
use esign_oxide::Result;

enum Command {
    Issue {
        subject: String,
        email: String,
        purpose: TokenPurpose,
        validity: Option<chrono::Duration>,
    },
    Inspect {
        token: String,
        purpose: Option<TokenPurpose>,
    },
    Notice {
        jurisdiction: Jurisdiction,
    },
}

struct CliConfig {
    command: Command,
    verbose: bool,
}

impl CliConfig {
    fn from_args() -> std::result::Result<Self, String> {
        let args: Vec<String> = std::env::args().collect();
        let name = args.get(1).ok_or("missing command")?.clone();

        let mut subject = None;
        let mut email = None;
        let mut purpose = None;
        let mut validity = None;
        let mut jurisdiction = Jurisdiction::Generic;
        let mut positional = Vec::new();
        let mut verbose = false;

        let mut i = 2;
        while i < args.len() {
            match args[i].as_str() {
                "--subject" => {
                    i += 1;
                    subject = args.get(i).cloned();
                },
                "--email" => {
                    i += 1;
                    email = args.get(i).cloned();
                },
                "--purpose" => {
                    i += 1;
                    let value = args.get(i).ok_or("--purpose needs a value")?;
                    purpose = Some(value.parse::<TokenPurpose>().map_err(|e| e.to_string())?);
                },
                "--hours" => {
                    i += 1;
                    let value = args.get(i).ok_or("--hours needs a value")?;
                    validity = Some(parse_hours(value)?);
                },
                "--jurisdiction" => {
                    i += 1;
                    jurisdiction = match args.get(i).map(|s| s.to_ascii_lowercase()).as_deref() {
                        Some("eu") => Jurisdiction::Eu,
                        Some("us") => Jurisdiction::Us,
                        Some("generic") => Jurisdiction::Generic,
                        other => return Err(format!("unknown jurisdiction {:?}", other)),
                    };
                },
                "--verbose" | "-v" => {
                    verbose = true;
                },
                other => positional.push(other.to_string()),
            }
            i += 1;
        }

        let command = match name.as_str() {
            "issue" => Command::Issue {
                subject: subject.ok_or("issue requires --subject")?,
                email: email.ok_or("issue requires --email")?,
                purpose: purpose.unwrap_or(TokenPurpose::ContractSigning),
                validity,
            },
            "inspect" => Command::Inspect {
                token: positional.into_iter().next().ok_or("inspect requires a token")?,
                purpose,
            },
            "notice" => Command::Notice { jurisdiction },
            other => return Err(format!("unknown command '{}'", other)),
        };

        Ok(Self { command, verbose })
    }
}

fn parse_hours(value: &str) -> std::result::Result<chrono::Duration, String> {
    let hours = value
        .parse::<i64>()
        .map_err(|e| format!("--hours: {}", e))?;
    chrono::Duration::try_hours(hours).ok_or_else(|| format!("--hours: {} is out of range", hours))
}

fn run(config: CliConfig) -> Result<()> {
    match config.command {
        Command::Notice { jurisdiction } => {
            print!("{}", compliance_notice(jurisdiction).render_text());
        },
        Command::Issue {
            subject,
            email,
            purpose,
            validity,
        } => {
            let policy = TokenPolicy::new(&TokenConfig::from_env()?)?;
            let token = policy.issue(&subject, &email, purpose, None, validity)?;
            println!("{}", token);
        },
        Command::Inspect { token, purpose } => {
            let policy = TokenPolicy::new(&TokenConfig::from_env()?)?;
            match policy.verify(&token, purpose) {
                Ok(payload) => {
                    println!("valid");
                    println!("  purpose:   {}", payload.purpose);
                    println!("  subject:   {}", payload.subject_id);
                    println!("  secondary: {}", payload.secondary_subject_id);
                    println!("  issued:    {}", payload.issued_at);
                    println!("  expires:   {}", payload.expires_at);
                },
                Err(e) => {
                    println!("invalid");
                    if config.verbose {
                        println!("  reason: {}", e);
                    }
                    std::process::exit(2);
                },
            }
        },
    }
    Ok(())
}

fn main() {
    env_logger::init();

    let config = match CliConfig::from_args() {
        Ok(config) => config,
        Err(message) => {
            eprintln!("Error: {}", message);
            eprintln!("Usage: esign_token <issue|inspect|notice> [options]");
            std::process::exit(1);
        },
    };

    if let Err(e) = run(config) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hours() {
        assert_eq!(parse_hours("168"), Ok(chrono::Duration::hours(168)));
        assert!(parse_hours("abc").is_err());
        assert!(parse_hours(&i64::MAX.to_string()).is_err());
        assert!(parse_hours("-9223372036854775808").is_err());
    }
}
