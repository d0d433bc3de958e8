use colored::Colorize;
use oml_sdk::{CorpusSearch, Oml, OmlConfig, PersistFormat, XmlConverter};
use serde_json::json;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => OmlConfig::from_file(path)?,
        None => OmlConfig::default(),
    };
    let oml = Oml::with_config(config);
    let json = matches!(cli.format, OutputFormat::Json);

    match cli.command {
        Command::Versions(args) => cmd_versions(&oml, args, json),
        Command::Headers(args) => cmd_headers(&oml, args, json),
        Command::Fragments(args) => cmd_fragments(&oml, args, json),
        Command::Manipulate(args) => cmd_manipulate(&oml, args, json),
        Command::Search(args) => cmd_search(&oml, args, json),
        Command::Convert(args) => cmd_convert(oml, args, json),
    }
}

fn print_lines(lines: &[String], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(lines)?);
    } else {
        for line in lines {
            println!("{line}");
        }
    }
    Ok(())
}

fn cmd_versions(oml: &Oml, args: VersionsArgs, json: bool) -> anyhow::Result<()> {
    print_lines(&oml.list_platform_versions(args.latest, args.full), json)
}

fn cmd_headers(oml: &Oml, args: HeadersArgs, json: bool) -> anyhow::Result<()> {
    let lines = oml.show_headers(&args.input, &args.platform, args.name.as_deref())?;
    if json || args.name.is_some() {
        return print_lines(&lines, json);
    }
    for line in &lines {
        match line.split_once(':') {
            Some((name, value)) => println!("{}:{}", name.bold(), value),
            None => println!("{line}"),
        }
    }
    Ok(())
}

fn cmd_fragments(oml: &Oml, args: FragmentsArgs, json: bool) -> anyhow::Result<()> {
    let lines = oml.show_fragments(&args.input, &args.platform, args.name.as_deref())?;
    print_lines(&lines, json)
}

fn cmd_manipulate(oml: &Oml, args: ManipulateArgs, json: bool) -> anyhow::Result<()> {
    let format = oml.manipulate(
        &args.input,
        &args.output,
        &args.platform,
        args.save_as.as_deref(),
        args.headers.as_slice(),
        args.fragments.as_slice(),
    )?;
    let kind = match format {
        PersistFormat::Xml => "xml",
        PersistFormat::Native => "native",
    };
    if json {
        let out = json!({
            "output": args.output.display().to_string(),
            "format": kind,
            "header_edits": args.headers.len(),
            "fragment_edits": args.fragments.len(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!(
            "{} Saved {} ({})",
            "✓".green().bold(),
            args.output.display().to_string().bold(),
            kind.cyan()
        );
    }
    Ok(())
}

fn cmd_search(oml: &Oml, args: SearchArgs, json: bool) -> anyhow::Result<()> {
    let search = CorpusSearch::new(oml);
    if json {
        let result = search.scan(&args.dir, &args.keyword, &args.platform)?;
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }
    search.scan_with_progress(&args.dir, &args.keyword, &args.platform, |line| {
        if line.starts_with('[') {
            println!("{line}");
        } else {
            println!("{}", line.bold());
        }
    })?;
    Ok(())
}

fn cmd_convert(oml: Oml, args: ConvertArgs, json: bool) -> anyhow::Result<()> {
    let text = XmlConverter::with_facade(oml).convert_file(&args.input);
    if let Some(message) = text.strip_prefix("Error: ") {
        anyhow::bail!("{message}");
    }
    if json {
        println!("{}", serde_json::to_string_pretty(&json!({ "xml": text }))?);
    } else {
        println!("{text}");
    }
    Ok(())
}
