use anyhow::{Context, bail};
use clap::{Subcommand, ValueEnum};
use dashboard_client::DashboardClient;
use dashboard_core::list::ListQuery;
use dashboard_core::route::RouteForm;
use dashboard_plugin::{FormHandle, FormState, PLUGIN_UI_LIST, select_plugin_form};
use serde::Serialize;
use serde_json::{Value, json};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage routes
    #[command(subcommand)]
    Routes(RouteCommand),

    /// Inspect upstreams
    #[command(subcommand)]
    Upstreams(UpstreamCommand),

    /// Check which hosts have a certificate
    #[command(subcommand)]
    Ssl(SslCommand),

    /// Known route labels grouped by key
    Labels,

    /// Plugin configuration forms
    #[command(subcommand)]
    Plugins(PluginCommand),
}

#[derive(Subcommand, Debug)]
pub enum RouteCommand {
    List {
        #[arg(long, default_value_t = ListQuery::DEFAULT_PAGE)]
        page: u32,
        #[arg(long, default_value_t = ListQuery::DEFAULT_PAGE_SIZE)]
        page_size: u32,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        uri: Option<String>,
        /// `key:value`, repeatable
        #[arg(long = "label")]
        labels: Vec<String>,
    },
    Get { rid: u64 },
    /// Create a route from a JSON or YAML route form file
    Create { file: std::path::PathBuf },
    Update { rid: u64, file: std::path::PathBuf },
    Delete { rid: String },
    CheckName {
        #[arg(long, default_value = "")]
        name: String,
        /// Route id allowed to hold the name already
        #[arg(long, default_value = "")]
        exclude: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum UpstreamCommand {
    List,
    Get { id: String },
}

#[derive(Subcommand, Debug)]
pub enum SslCommand {
    Check {
        #[arg(required = true)]
        hosts: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum PluginCommand {
    /// Plugins that have a form
    List,
    /// Show a plugin form, optionally filled with `--set field=value`
    Form {
        name: String,
        #[arg(long = "set", value_parser = parse_assignment)]
        values: Vec<(String, Value)>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

/// `field=value`; the value is read as JSON and falls back to a plain string.
pub fn parse_assignment(s: &str) -> Result<(String, Value), String> {
    let (field, raw) = s
        .split_once('=')
        .ok_or_else(|| format!("expected field=value, got {s:?}"))?;
    if field.is_empty() {
        return Err(format!("missing field name in {s:?}"));
    }
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((field.to_string(), value))
}

/// Read a route form document; `.yaml` / `.yml` files are YAML, anything else JSON.
pub fn read_route_form(path: &Path) -> anyhow::Result<RouteForm> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading route form {}", path.display()))?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    let form = if is_yaml {
        serde_yaml::from_str(&text)?
    } else {
        serde_json::from_str(&text)?
    };
    Ok(form)
}

pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Yaml => serde_yaml::to_string(value)?,
    })
}

/// Build the plugin form output. Unknown plugins are reported as an error
/// here; the selector itself stays silent.
pub fn plugin_form(name: &str, values: &[(String, Value)]) -> anyhow::Result<Value> {
    let handle: Arc<dyn FormHandle> = Arc::new(FormState::new());
    for (field, value) in values {
        handle.set(field, value.clone());
    }
    let Some(form) = select_plugin_form(name, &handle) else {
        bail!(
            "no form for plugin {name:?}; available: {}",
            PLUGIN_UI_LIST.join(", ")
        );
    };
    let config = match form.to_config() {
        Ok(config) => json!({ "valid": true, "config": config }),
        Err(errors) => json!({
            "valid": false,
            "errors": errors.iter().map(|e| e.to_string()).collect::<Vec<_>>(),
        }),
    };
    Ok(json!({
        "plugin": form.name(),
        "fields": form.render(),
        "result": config,
    }))
}

pub async fn run(client: &DashboardClient, command: Command) -> anyhow::Result<Value> {
    let value = match command {
        Command::Routes(cmd) => match cmd {
            RouteCommand::List { page, page_size, name, uri, labels } => {
                let query = ListQuery {
                    current: Some(page),
                    page_size: Some(page_size),
                    name,
                    uri,
                    labels,
                };
                serde_json::to_value(client.fetch_list(&query).await?)?
            }
            RouteCommand::Get { rid } => serde_json::to_value(client.fetch_item(rid).await?)?,
            RouteCommand::Create { file } => {
                let form = read_route_form(&file)?;
                info!(name = %form.step1.name, "Creating route");
                client.create(&form).await?
            }
            RouteCommand::Update { rid, file } => {
                let form = read_route_form(&file)?;
                info!(rid, "Updating route");
                client.update(rid, &form).await?
            }
            RouteCommand::Delete { rid } => {
                info!(rid = %rid, "Deleting route");
                client.remove(&rid).await?
            }
            RouteCommand::CheckName { name, exclude } => {
                client.check_unique_name(&name, &exclude).await?
            }
        },
        Command::Upstreams(cmd) => match cmd {
            UpstreamCommand::List => serde_json::to_value(client.fetch_upstream_list().await?)?,
            UpstreamCommand::Get { id } => {
                serde_json::to_value(client.fetch_upstream_item(&id).await?)?
            }
        },
        Command::Ssl(SslCommand::Check { hosts }) => client.check_host_with_ssl(&hosts).await?,
        Command::Labels => serde_json::to_value(client.fetch_label_list().await?)?,
        Command::Plugins(cmd) => match cmd {
            PluginCommand::List => json!(PLUGIN_UI_LIST),
            PluginCommand::Form { name, values } => plugin_form(&name, &values)?,
        },
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_assignment_parses_json_or_string() {
        assert_eq!(parse_assignment("conn=10").unwrap(), ("conn".into(), json!(10)));
        assert_eq!(parse_assignment("whitelist=[\"a.com\"]").unwrap().1, json!(["a.com"]));
        assert_eq!(
            parse_assignment("host=http://m:80").unwrap().1,
            json!("http://m:80")
        );
        assert!(parse_assignment("novalue").is_err());
        assert!(parse_assignment("=1").is_err());
    }

    #[test]
    fn test_plugin_form_reports_result() {
        let out = plugin_form(
            "limit-conn",
            &[
                ("conn".into(), json!(1)),
                ("burst".into(), json!(0)),
                ("default_conn_delay".into(), json!(0.5)),
            ],
        )
        .unwrap();
        assert_eq!(out["plugin"], json!("limit-conn"));
        assert_eq!(out["result"]["valid"], json!(true));
        assert_eq!(out["result"]["config"]["rejected_code"], json!(503));
        assert_eq!(out["fields"].as_array().unwrap().len(), 5);

        let out = plugin_form("basic-auth", &[]).unwrap();
        assert_eq!(out["result"]["valid"], json!(false));
        assert_eq!(out["result"]["errors"][0], json!("username: is required"));
    }

    #[test]
    fn test_plugin_form_unknown_plugin_errors() {
        let err = plugin_form("cors", &[]).unwrap_err();
        assert!(err.to_string().contains("basic-auth"));
    }

    #[test]
    fn test_route_form_reads_yaml_and_json() {
        let mut yaml = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        write!(yaml, "step1:\n  name: orders\n  paths: [\"/orders\"]\n").unwrap();
        let form = read_route_form(yaml.path()).unwrap();
        assert_eq!(form.step1.name, "orders");

        let mut json_file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(json_file, r#"{{"step1": {{"name": "users"}}}}"#).unwrap();
        assert_eq!(read_route_form(json_file.path()).unwrap().step1.name, "users");
    }

    #[test]
    fn test_render_formats() {
        let value = json!({"a": 1});
        assert_eq!(render(&value, OutputFormat::Json).unwrap(), "{\n  \"a\": 1\n}");
        assert_eq!(render(&value, OutputFormat::Yaml).unwrap(), "a: 1\n");
    }
}
