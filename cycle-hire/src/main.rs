use std::process::ExitCode;

use cycle_hire::registry::{StaticLocationKey, StaticLocationRegistry};
use cycle_hire::service::{CycleHireSession, HireOptions, SearchOptions, SessionConfig};
use cycle_hire::transport::{HttpTransport, HttpTransportConfig};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "usage: cycle-hire <search text> [--hire <n>]";

/// Parsed command line.
struct Args {
    search_text: String,
    hire_index: Option<usize>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args, String> {
    let mut words = Vec::new();
    let mut hire_index = None;
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        if arg == "--hire" {
            let n = args.next().ok_or("--hire needs a result number")?;
            let n: usize = n
                .parse()
                .map_err(|_| format!("invalid result number: {n}"))?;
            if n == 0 {
                return Err("result numbers start at 1".to_string());
            }
            hire_index = Some(n - 1);
        } else {
            words.push(arg);
        }
    }

    if words.is_empty() {
        return Err(USAGE.to_string());
    }
    Ok(Args {
        search_text: words.join(" "),
        hire_index,
    })
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(2);
        }
    };

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match std::env::var("CYCLE_HIRE_USERAUTH") {
        Ok(user_auth) => {
            let config = SessionConfig::new(&user_auth)?;
            let registry = StaticLocationRegistry::builtin().with_user_auth(&config.user_auth);
            config.with_registry(registry)
        }
        Err(_) => {
            warn!("CYCLE_HIRE_USERAUTH not set, using the captured example user auth");
            SessionConfig::default()
        }
    };

    let prime_location = match std::env::var("CYCLE_HIRE_PRIME_LOCATION") {
        Ok(key) => key.parse::<StaticLocationKey>()?,
        Err(_) => StaticLocationKey::CromerStreet,
    };
    config = config.with_default_static_key(prime_location);

    let mut transport_config = HttpTransportConfig::default();
    if let Ok(base_url) = std::env::var("CYCLE_HIRE_BASE_URL") {
        transport_config = transport_config.with_base_url(base_url);
    }
    let transport = HttpTransport::new(transport_config)?;

    let mut session = CycleHireSession::new(transport, config);
    session.prime_tokens_from_static_location(prime_location)?;
    info!(location = %prime_location, "tokens primed");

    let stations = session
        .search_stations(&args.search_text, SearchOptions::new())
        .await?;

    if stations.is_empty() {
        println!("No stations found for '{}'", args.search_text);
        return Ok(());
    }

    println!("Found {} stations:", stations.len());
    for (i, station) in stations.iter().enumerate() {
        let marker = if station.is_hirable() { "" } else { " [not hirable]" };
        println!("  {:>2}. {station}{marker}", i + 1);
    }

    if let Some(index) = args.hire_index {
        let station = stations
            .get(index)
            .ok_or_else(|| format!("no result number {}", index + 1))?;
        let outcome = session.hire_searched(station, HireOptions::new()).await?;
        println!();
        println!("Release code for {}: {}", outcome.station, outcome.code);
        println!("Token tier: {}", outcome.tier);
        println!("Active tokens: {}", session.active_tokens().provenance());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args, String> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn search_words_are_joined() {
        let parsed = args(&["warren", "street"]).unwrap();
        assert_eq!(parsed.search_text, "warren street");
        assert_eq!(parsed.hire_index, None);
    }

    #[test]
    fn hire_index_is_one_based() {
        let parsed = args(&["soho", "--hire", "2"]).unwrap();
        assert_eq!(parsed.search_text, "soho");
        assert_eq!(parsed.hire_index, Some(1));
    }

    #[test]
    fn bad_arguments() {
        assert!(args(&[]).is_err());
        assert!(args(&["soho", "--hire"]).is_err());
        assert!(args(&["soho", "--hire", "0"]).is_err());
        assert!(args(&["soho", "--hire", "x"]).is_err());
    }
}
