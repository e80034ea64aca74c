use anyhow::Context;
use visit_registry::infra::config::AppConfig;
use visit_registry::infra::logging::init_logging;
use visit_registry::{storage, VisitService};

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin preflight -- [--init-schema]\n\
         \n\
         Reads the same env vars as api_server:\n\
           VISIT_STORE (memory|sqlite|postgres), SQLITE_PATH, DATABASE_URL,\n\
           DB_MAX_CONNECTIONS, BIND_ADDR, LOG_LEVEL, APP_ENV, SEED_SAMPLE_DATA\n"
    );
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }
    let init_schema = args.iter().any(|a| a == "--init-schema");

    let config = AppConfig::from_env().context("invalid configuration")?;
    init_logging(&config.log_level);

    println!("> Preflight:");
    println!("  VISIT_STORE={}", config.store);
    println!("  BIND_ADDR={}", config.bind_addr);
    println!("  APP_ENV={}", if config.production { "production" } else { "development" });
    println!("  SEED_SAMPLE_DATA={}", config.seed_sample_data);

    let store = storage::connect(&config.store)
        .await
        .with_context(|| format!("could not open {} store", config.store))?;
    store.ping().await.context("store ping failed")?;
    println!("  Store reachable ({}).", store.backend_name());

    if init_schema {
        store
            .init_schema()
            .await
            .context("could not create the visits schema")?;
        println!("  Schema applied (table + indexes).");
    }

    let visits = VisitService::new(store);
    match visits.statistics().await {
        Ok(stats) => {
            println!("  Visits stored: {}", stats.total);
            println!("    Psychological:    {}", stats.by_category.psychological);
            println!("    Pedagogical:      {}", stats.by_category.pedagogical);
            println!("    SocialAssistance: {}", stats.by_category.social_assistance);
        }
        Err(e) => {
            eprintln!("  Warning: could not read statistics ({}).", e);
            if !init_schema {
                eprintln!("  Hint: run with --init-schema to create the visits table.");
            }
        }
    }

    println!("> Preflight OK");
    Ok(())
}
