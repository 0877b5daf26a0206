mod cli;

use mediaprobe::config;
use mp_av::ToolRegistry;
use mp_core::{HeaderSet, Requirements};

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;
use std::time::Duration;

/// Options of the `inspect` subcommand.
struct InspectOptions {
    locator: String,
    requirements: Requirements,
    headers: Vec<String>,
    timeout: Option<u64>,
    json: bool,
}

async fn inspect(config_path: Option<&Path>, opts: InspectOptions) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    let mut headers = config.probe.default_headers();
    for line in &opts.headers {
        let Some((name, value)) = HeaderSet::parse_line(line) else {
            anyhow::bail!("Invalid header {:?}; expected \"Name: Value\"", line);
        };
        headers.insert(name, value);
    }

    let registry = ToolRegistry::discover(&config.tools);
    let mut probe = registry.media_probe(&config.probe)?;
    if let Some(secs) = opts.timeout {
        if secs == 0 {
            anyhow::bail!("--timeout must be greater than 0");
        }
        probe = probe.with_timeout(Duration::from_secs(secs));
    }

    tracing::debug!("Inspecting {} with {:?}", opts.locator, opts.requirements);

    let headers = (!headers.is_empty()).then_some(headers);
    let result = probe
        .inspect(&opts.locator, &opts.requirements, headers.as_ref())
        .await?;

    if opts.json {
        let value = serde_json::json!({
            "locator": opts.locator,
            "result": result,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("Source: {}", opts.locator);
        println!("Result: {}", result);
        println!(
            "Headers applied: {}",
            if result.header_applied() { "yes" } else { "no" }
        );
    }

    Ok(())
}

async fn check_tools(config_path: Option<&Path>) -> Result<()> {
    println!("Checking external tools...\n");

    let config = config::load_config_or_default(config_path)?;
    let tools = ToolRegistry::discover(&config.tools).check_all().await;
    let mut all_ok = true;

    for tool in &tools {
        let status = if tool.available {
            "✓"
        } else {
            all_ok = false;
            "✗"
        };

        print!("{} {}", status, tool.name);

        if let Some(ref version) = tool.version {
            print!(" ({})", version);
        }

        if let Some(ref path) = tool.path {
            print!(" - {}", path.display());
        }

        println!();
    }

    println!();
    if all_ok {
        println!("All required tools are available!");
    } else {
        println!("Some tools are missing. Install FFmpeg to enable inspection.");
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            config
        }
        None => {
            println!("No config file specified, using defaults");
            config::Config::default()
        }
    };

    match &config.tools.ffprobe_path {
        Some(p) => println!("  ffprobe: {}", p.display()),
        None => println!("  ffprobe: (search PATH)"),
    }
    println!("  Timeout: {}s", config.probe.timeout_secs);
    println!(
        "  Extra network schemes: {}",
        config.probe.extra_network_schemes.len()
    );
    println!("  Default headers: {}", config.probe.default_headers.len());

    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Inspect {
            locator,
            audio,
            video,
            count_images,
            headers,
            timeout,
            json,
        } => {
            let opts = InspectOptions {
                locator,
                requirements: Requirements::none()
                    .with_audio(audio)
                    .with_video(video)
                    .with_still_images(count_images),
                headers,
                timeout,
                json,
            };
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(inspect(cli.config.as_deref(), opts))
        }
        Commands::CheckTools => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(check_tools(cli.config.as_deref()))
        }
        Commands::Validate { file } => {
            let path = file.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("mediaprobe {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "mediaprobe=trace,mp_av=trace,mp_core=debug".to_string()
        } else {
            "mediaprobe=info,mp_av=warn,mp_core=warn".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(cli) {
        eprintln!("Error: {err:#}");
        let code = err
            .downcast_ref::<mp_core::Error>()
            .map(mp_core::Error::exit_code)
            .unwrap_or(1);
        std::process::exit(code);
    }
}
