use anyhow::{Context, bail};
use chrono::{Local, Utc};
use clap::{Args, Parser, Subcommand};
use std::{net::SocketAddr, path::PathBuf};
use weather_core::{
    Config, Environment, Overrides, RandomSource, SeededRandom, ServiceVariant, ThreadRandom,
    forecast,
};

use weather_api::{openapi, serve, shutdown_signal};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-api", version, about = "Weather forecast sample services")]
pub struct Cli {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    /// Emit logs as JSON.
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP server.
    Serve {
        #[command(flatten)]
        file: ConfigFile,

        /// Service variant: documented, validated or json-codec.
        #[arg(long, env = "WEATHER_SERVICE")]
        service: Option<ServiceVariant>,

        /// Address to listen on, e.g. 127.0.0.1:5252.
        #[arg(long, env = "WEATHER_LISTEN")]
        listen: Option<SocketAddr>,

        /// development or production. Documentation is served in development only.
        #[arg(long, env = "WEATHER_ENVIRONMENT")]
        environment: Option<Environment>,

        /// The single origin allowed to call the documented service cross-origin.
        #[arg(long, env = "WEATHER_ALLOWED_ORIGIN")]
        allowed_origin: Option<String>,

        /// Redirect plain-HTTP requests to HTTPS on this port.
        #[arg(long, env = "WEATHER_HTTPS_PORT")]
        https_port: Option<u16>,
    },

    /// Print a generated forecast as JSON.
    Forecast {
        #[arg(long, default_value_t = ServiceVariant::Documented)]
        service: ServiceVariant,

        /// Seed for a reproducible forecast.
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Print the OpenAPI document of a service variant.
    Openapi {
        #[arg(long, default_value_t = ServiceVariant::Documented)]
        service: ServiceVariant,
    },

    /// Show or create the configuration file.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the configuration file path and its effective contents.
    Show {
        #[command(flatten)]
        file: ConfigFile,
    },

    /// Write the default configuration.
    Init {
        #[command(flatten)]
        file: ConfigFile,

        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Clone, Args)]
pub struct ConfigFile {
    /// Configuration file. Defaults to the platform config directory.
    #[arg(long = "config", env = "WEATHER_CONFIG")]
    pub path: Option<PathBuf>,
}

impl ConfigFile {
    fn path(&self) -> anyhow::Result<PathBuf> {
        match &self.path {
            Some(path) => Ok(path.clone()),
            None => Config::config_file_path(),
        }
    }

    fn load(&self) -> anyhow::Result<Config> {
        match &self.path {
            Some(path) => Config::load_from(path),
            None => Config::load(),
        }
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Serve {
                file,
                service,
                listen,
                environment,
                allowed_origin,
                https_port,
            } => {
                let mut config = file.load()?;
                config.apply(Overrides {
                    listen,
                    environment,
                    service,
                    allowed_origin,
                    https_port,
                });

                serve(config, shutdown_signal()).await?;
            }
            Command::Forecast { service, seed } => {
                let random: Box<dyn RandomSource> = match seed {
                    Some(seed) => Box::new(SeededRandom::new(seed)),
                    None => Box::new(ThreadRandom),
                };
                let policy = service.summary_policy();

                let entries = match service {
                    ServiceVariant::JsonCodec => {
                        forecast::timed_forecast(random.as_ref(), Utc::now(), policy)
                    }
                    _ => forecast::daily_forecast(random.as_ref(), Local::now().date_naive(), policy),
                };

                println!("{}", serde_json::to_string_pretty(&entries)?);
            }
            Command::Openapi { service } => {
                let doc = openapi::document(service)
                    .to_pretty_json()
                    .context("Failed to render OpenAPI document")?;
                println!("{doc}");
            }
            Command::Config { action } => match action {
                ConfigAction::Show { file } => {
                    let path = file.path()?;
                    let config = file.load()?;

                    println!("# {}", path.display());
                    print!("{}", config.to_toml()?);
                }
                ConfigAction::Init { file, force } => {
                    let path = file.path()?;
                    if path.exists() && !force {
                        bail!(
                            "Config file already exists: {}\n\
                             Hint: pass --force to overwrite it.",
                            path.display()
                        );
                    }

                    let written = match file.path {
                        Some(path) => {
                            Config::default().save_to(&path)?;
                            path
                        }
                        None => Config::default().save()?,
                    };
                    println!("Wrote default configuration to {}", written.display());
                }
            },
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn serve_flags_parse_into_typed_values() {
        let cli = Cli::try_parse_from([
            "weather-api",
            "serve",
            "--service",
            "json-codec",
            "--environment",
            "production",
            "--listen",
            "0.0.0.0:8080",
            "--https-port",
            "8443",
        ])
        .expect("valid arguments");

        match cli.command {
            Command::Serve {
                service,
                environment,
                listen,
                https_port,
                ..
            } => {
                assert_eq!(service, Some(ServiceVariant::JsonCodec));
                assert_eq!(environment, Some(Environment::Production));
                assert_eq!(listen, Some("0.0.0.0:8080".parse().unwrap()));
                assert_eq!(https_port, Some(8443));
            }
            other => panic!("expected serve, got {other:?}"),
        }
    }

    #[test]
    fn unknown_service_is_rejected() {
        let err = Cli::try_parse_from(["weather-api", "openapi", "--service", "soap"]).unwrap_err();
        assert!(err.to_string().contains("Unknown service 'soap'"));
    }

    #[test]
    fn forecast_defaults_to_documented() {
        let cli = Cli::try_parse_from(["weather-api", "forecast", "--seed", "7"]).unwrap();

        match cli.command {
            Command::Forecast { service, seed } => {
                assert_eq!(service, ServiceVariant::Documented);
                assert_eq!(seed, Some(7));
            }
            other => panic!("expected forecast, got {other:?}"),
        }
    }

    #[test]
    fn explicit_config_path_is_loaded_from_that_file() {
        let file = ConfigFile {
            path: Some(std::env::temp_dir().join("weather-api-absent").join("config.toml")),
        };

        assert_eq!(file.load().unwrap(), Config::default());
        assert!(file.path().unwrap().ends_with("weather-api-absent/config.toml"));
    }
}
