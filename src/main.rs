use anyhow::{bail, Result};
use localized_validations::config::Config;
use localized_validations::i18n::{audit, ResolutionMetrics};
use localized_validations::validation::{MessageResolver, ResolutionContext, RuleTable, Value};
use tracing::{info, warn};

/// Parse a command-line argument into the most specific value it reads as.
fn parse_arg(raw: &str) -> Value {
    if raw == "nil" {
        return Value::Nil;
    }
    if let Ok(i) = raw.parse::<i64>() {
        return Value::Int(i);
    }
    if let Ok(f) = raw.parse::<f64>() {
        return Value::Float(f);
    }
    if raw.contains(',') {
        return Value::List(raw.split(',').map(|s| Value::from(s.trim())).collect());
    }
    Value::from(raw)
}

fn main() -> Result<()> {
    // Load .env file (ignored when absent)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("localized_validations=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 3 {
        bail!("Usage: resolve-message <model> <attribute> <rule> [args...]");
    }

    let config = Config::from_env()?;
    let catalog = config.load_catalog()?;
    info!(
        "Loaded catalog with locales {:?} (active: {})",
        catalog.locales(),
        config.locale
    );

    let rules = RuleTable::defaults();
    let report = audit(&rules, &catalog, &config.locale);
    for warning in &report.warnings {
        warn!("{}", warning);
    }
    let view = catalog.localized(&config.locale);
    rules.ensure_resolvable(&view)?;

    let context = ResolutionContext::new(config.scope.as_str(), &*args[0], &*args[1], &*args[2])
        .with_args(args[3..].iter().map(|a| parse_arg(a)).collect());

    let message = MessageResolver::new(&view, &rules).resolve_rule(&context);
    println!("{}", message);

    info!(
        "Resolution metrics: {}",
        serde_json::to_string(&ResolutionMetrics::global().report())?
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_arg() {
        assert_eq!(parse_arg("nil"), Value::Nil);
        assert_eq!(parse_arg("10"), Value::Int(10));
        assert_eq!(parse_arg("1.5"), Value::Float(1.5));
        assert_eq!(
            parse_arg("integer,float"),
            Value::List(vec![Value::from("integer"), Value::from("float")])
        );
        assert_eq!(parse_arg("draft"), Value::from("draft"));
    }
}
