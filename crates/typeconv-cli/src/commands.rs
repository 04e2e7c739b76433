use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use serde_json::json;
use typeconv_mapping::{Entity, InMemoryKeyspace, MappingTemplate, Row};
use typeconv_registry::ConversionRegistry;

use crate::cli::*;
use crate::config::AppConfig;
use crate::model::{self, Employee, Person};

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = AppConfig::load(cli.config.as_deref())?;
    match cli.command {
        Command::Encode(args) => cmd_encode(&config, args, cli.format),
        Command::Decode(args) => cmd_decode(&config, args, cli.format),
        Command::Demo(args) => cmd_demo(&config, args, cli.format),
    }
}

fn cmd_encode(config: &AppConfig, args: EncodeArgs, format: OutputFormat) -> anyhow::Result<()> {
    let registry = model::registry(config.conversion.clone())?;
    let stored = registry.write(&Person::new(args.firstname, args.lastname))?;
    match format {
        OutputFormat::Text => println!("{stored}"),
        OutputFormat::Json => println!("{}", json!({ "stored": stored })),
    }
    Ok(())
}

fn cmd_decode(config: &AppConfig, args: DecodeArgs, format: OutputFormat) -> anyhow::Result<()> {
    let registry = model::registry(config.conversion.clone())?;
    let person = registry
        .read::<Person>(&args.stored)
        .context("stored value is not a person")?;
    match (format, person) {
        (OutputFormat::Json, person) => println!("{}", json!({ "person": person })),
        (OutputFormat::Text, Some(p)) => {
            println!("{} {} {}", "✓".green().bold(), p.firstname.bold(), p.lastname);
        }
        (OutputFormat::Text, None) => println!("{}", "(absent)".dimmed()),
    }
    Ok(())
}

fn cmd_demo(config: &AppConfig, args: DemoArgs, format: OutputFormat) -> anyhow::Result<()> {
    let registry = Arc::new(model::registry(config.conversion.clone())?);
    let store = Arc::new(InMemoryKeyspace::open(&config.keyspace)?);
    let ops = MappingTemplate::new(store, registry, config.keyspace.clone());
    ops.prepare::<Employee>()?;

    let table = Employee::table();
    let columns: Vec<&str> = table.columns.iter().map(|c| c.name.as_str()).collect();

    let mut employee = Employee::new(&args.id);
    ops.insert(&employee)?;
    let after_insert = ops.select_row(&table.name, &args.id, &columns)?.unwrap_or_default();

    employee.person = Some(Person::new("Homer", "Simpson"));
    employee.friends = vec![Person::new("Carl", "Carlson"), Person::new("Lenny", "Leonard")];
    employee.people = [Person::new("Apu", "Nahasapeemapetilon")].into_iter().collect();
    ops.update(&employee)?;
    let after_update = ops.select_row(&table.name, &args.id, &columns)?.unwrap_or_default();

    let loaded: Employee = ops
        .select_one(&args.id)?
        .with_context(|| format!("employee {} vanished", args.id))?;
    anyhow::ensure!(loaded == employee, "loaded employee differs from the stored one");

    let converters = converter_names(ops.registry());
    let blank_is_absent = ops.registry().config().blank_source_is_absent;

    match format {
        OutputFormat::Json => {
            let report = json!({
                "keyspace": ops.store().name(),
                "converters": converters,
                "blank_source_is_absent": blank_is_absent,
                "after_insert": after_insert,
                "after_update": after_update,
                "loaded": loaded,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            println!("Keyspace {}", ops.store().name().bold());
            println!(
                "Converters {} (blank source is absent: {})",
                converters.join(", ").yellow(),
                blank_is_absent
            );
            print_row("after insert", &after_insert);
            print_row("after update", &after_update);
            println!(
                "{} Loaded {} with {} friends and {} people",
                "✓".green().bold(),
                loaded.id.yellow(),
                loaded.friends.len(),
                loaded.people.len()
            );
        }
    }
    Ok(())
}

/// Short names of the registered converter types, sorted.
fn converter_names(registry: &ConversionRegistry) -> Vec<&'static str> {
    let mut names: Vec<&'static str> = registry.registered_types().map(|key| key.short_name()).collect();
    names.sort_unstable();
    names
}

fn print_row(label: &str, row: &Row) {
    println!("{}", label.cyan());
    for (column, cell) in row.columns() {
        let value = serde_json::to_string(cell).unwrap_or_default();
        println!("  {} = {}", column.bold(), value);
    }
}
