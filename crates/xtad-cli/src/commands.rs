use std::fs;

use anyhow::Context;
use colored::Colorize;
use serde_json::json;
use xtad_sdk::{MetadataEntry, ObjectId, StoreConfig, XtadStore};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let store = open_store(&cli)?;
    let format = cli.format;
    match cli.command {
        Command::Create(args) => cmd_create(&store, args, format),
        Command::Show(args) => cmd_show(&store, args, format),
        Command::List => cmd_list(&store, format, false),
        Command::Orphans => cmd_list(&store, format, true),
        Command::Dup(args) => cmd_dup(&store, args, format),
        Command::DupShallow(args) => cmd_dup_shallow(&store, args, format),
        Command::Inc(args) => cmd_adjust(&store, args, format, true),
        Command::Dec(args) => cmd_adjust(&store, args, format, false),
        Command::Rm(args) => cmd_rm(&store, args, format),
        Command::Rename(args) => cmd_rename(&store, args, format),
    }
}

fn open_store(cli: &Cli) -> anyhow::Result<XtadStore> {
    let mut config = match &cli.config {
        Some(path) => StoreConfig::load(path)?,
        None => StoreConfig::default(),
    };
    if let Some(root) = &cli.root {
        config = config.with_base_dir(root.clone());
    }
    tracing::debug!(?config, "resolved store configuration");
    Ok(XtadStore::open(config)?)
}

fn parse_id(raw: &str) -> anyhow::Result<ObjectId> {
    ObjectId::parse(raw).with_context(|| format!("invalid object id '{raw}'"))
}

fn print_json(value: &serde_json::Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn read_content(args: &CreateArgs) -> anyhow::Result<String> {
    if let Some(path) = &args.file {
        return fs::read_to_string(path).with_context(|| format!("reading {}", path.display()));
    }
    Ok(args.content.clone().unwrap_or_default())
}

fn cmd_create(store: &XtadStore, args: CreateArgs, format: OutputFormat) -> anyhow::Result<()> {
    let content = read_content(&args)?;
    let id = store.create(&args.name, &content)?;
    match format {
        OutputFormat::Json => print_json(&json!({ "id": id, "name": args.name })),
        OutputFormat::Text => {
            println!(
                "{} Created {} ({})",
                "✓".green().bold(),
                args.name.bold(),
                id.to_string().cyan()
            );
            Ok(())
        }
    }
}

fn cmd_show(store: &XtadStore, args: IdArgs, format: OutputFormat) -> anyhow::Result<()> {
    let id = parse_id(&args.id)?;
    let object = store.load(&id)?;
    let references = store.references(&id)?;
    match format {
        OutputFormat::Json => {
            let records: Vec<_> = object.records.iter().map(|r| &r.content).collect();
            print_json(&json!({
                "id": id,
                "metadata": object.metadata,
                "records": records,
                "references": references,
            }))
        }
        OutputFormat::Text => {
            println!(
                "Object {}  {}",
                id.to_string().cyan().bold(),
                object.name().bold()
            );
            println!("  refCount: {}", object.ref_count().to_string().yellow());
            println!("  records:  {}", object.record_count());
            if let Some(created) = object.metadata.created_at {
                println!("  created:  {}", created.to_rfc3339().dimmed());
            }
            if let Some(updated) = object.metadata.updated_at {
                println!("  updated:  {}", updated.to_rfc3339().dimmed());
            }
            for (n, record) in object.records.iter().enumerate() {
                let images = record.images.len();
                println!("  [{n}] {} bytes, {images} image(s)", record.raw.len());
            }
            for target in &references {
                println!("  → {}", target.to_string().cyan());
            }
            Ok(())
        }
    }
}

fn cmd_list(store: &XtadStore, format: OutputFormat, orphans_only: bool) -> anyhow::Result<()> {
    let entries = if orphans_only {
        store.orphan_candidates()?
    } else {
        store.all_objects()?
    };
    match format {
        OutputFormat::Json => {
            let items: Vec<_> = entries
                .iter()
                .map(|e| json!({ "id": e.id, "metadata": e.metadata }))
                .collect();
            print_json(&serde_json::Value::Array(items))
        }
        OutputFormat::Text => {
            if entries.is_empty() && orphans_only {
                println!("No orphan candidates.");
            } else if entries.is_empty() {
                println!("No objects.");
            }
            for entry in &entries {
                print_entry(entry);
            }
            Ok(())
        }
    }
}

fn print_entry(entry: &MetadataEntry) {
    let count = entry.metadata.ref_count.to_string();
    let count = if entry.metadata.ref_count == 0 {
        count.red()
    } else {
        count.yellow()
    };
    let id = entry.id.to_string();
    println!("{}  {count:>4}  {}", id.cyan(), entry.metadata.name);
}

fn cmd_dup(store: &XtadStore, args: IdArgs, format: OutputFormat) -> anyhow::Result<()> {
    let source = parse_id(&args.id)?;
    let copy = store.duplicate(&source)?;
    report_copy(&source, &copy, format)
}

fn cmd_dup_shallow(
    store: &XtadStore,
    args: DupShallowArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let source = parse_id(&args.id)?;
    let copy = store.duplicate_shallow(&source, &args.name)?;
    report_copy(&source, &copy, format)
}

fn report_copy(source: &ObjectId, copy: &ObjectId, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => print_json(&json!({ "source": source, "copy": copy })),
        OutputFormat::Text => {
            println!(
                "{} Duplicated {} → {}",
                "✓".green().bold(),
                source.short_id().dimmed(),
                copy.to_string().cyan()
            );
            Ok(())
        }
    }
}

fn cmd_adjust(
    store: &XtadStore,
    args: IdArgs,
    format: OutputFormat,
    up: bool,
) -> anyhow::Result<()> {
    let id = parse_id(&args.id)?;
    let count = if up {
        store.increment(&id)?
    } else {
        store.decrement(&id)?
    };
    match format {
        OutputFormat::Json => print_json(&json!({ "id": id, "refCount": count })),
        OutputFormat::Text => {
            println!(
                "{} refCount = {}",
                id.to_string().cyan(),
                count.to_string().yellow().bold()
            );
            if count == 0 {
                println!("  {}", "orphan candidate (not deleted)".dimmed());
            }
            Ok(())
        }
    }
}

fn cmd_rm(store: &XtadStore, args: IdArgs, format: OutputFormat) -> anyhow::Result<()> {
    let id = parse_id(&args.id)?;
    store.physical_delete(&id)?;
    match format {
        OutputFormat::Json => print_json(&json!({ "id": id, "deleted": true })),
        OutputFormat::Text => {
            println!("{} Deleted {}", "✓".green().bold(), id.to_string().cyan());
            Ok(())
        }
    }
}

fn cmd_rename(store: &XtadStore, args: RenameArgs, format: OutputFormat) -> anyhow::Result<()> {
    let id = parse_id(&args.id)?;
    store.rename(&id, &args.name)?;
    match format {
        OutputFormat::Json => print_json(&json!({ "id": id, "name": args.name })),
        OutputFormat::Text => {
            println!(
                "{} Renamed {} to {}",
                "✓".green().bold(),
                id.to_string().cyan(),
                args.name.bold()
            );
            Ok(())
        }
    }
}
