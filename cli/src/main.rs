use adsview_core::StreamDescriptor;
use adsview_streams::{
    decode_text, delete, delete_all, exists, list, OpenMode, StreamHandle,
};
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "adsview")]
#[command(about = "Inspect and manage NTFS alternate data streams", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the streams on a file, or on each file in a folder
    List {
        /// File or folder to inspect
        path: PathBuf,
        /// Emit the stream descriptors as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print stream contents (every stream when no name is given)
    Show {
        /// File or folder to inspect
        path: PathBuf,
        /// Stream name; omit to show all streams
        stream: Option<String>,
    },
    /// Delete one stream, or every stream when no name is given
    Delete {
        /// File or folder to process
        path: PathBuf,
        /// Stream name; omit to delete all streams
        stream: Option<String>,
    },
    /// Write text into a stream on a file
    Write {
        /// Owning file
        path: PathBuf,
        /// Stream name
        stream: String,
        /// Text to store
        #[arg(short, long)]
        text: String,
        /// Append instead of truncating
        #[arg(long)]
        append: bool,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::List { path, json } => {
            for_each_entry(&path, |entry| list_streams(entry, json))
        }
        Commands::Show { path, stream } => {
            for_each_entry(&path, |entry| show_streams(entry, stream.as_deref()))
        }
        Commands::Delete { path, stream } => {
            for_each_entry(&path, |entry| delete_streams(entry, stream.as_deref()))
        }
        Commands::Write {
            path,
            stream,
            text,
            append,
        } => write_stream(&path, &stream, text.as_bytes(), append),
    }
}

/// Run `op` against a single file, or against every regular file directly
/// inside a folder (non-recursive). Per-file failures inside a folder are
/// reported on one line each and processing continues.
fn for_each_entry(
    path: &Path,
    op: impl Fn(&Path) -> anyhow::Result<()>,
) -> anyhow::Result<()> {
    if path.is_file() {
        op(path)
    } else if path.is_dir() {
        let entries =
            fs::read_dir(path).with_context(|| format!("cannot read folder {}", path.display()))?;
        for entry in entries {
            let entry = entry?;
            let entry_path = entry.path();
            if !entry_path.is_file() {
                continue;
            }
            if let Err(e) = op(&entry_path) {
                eprintln!("error: {}: {:#}", entry_path.display(), e);
            }
        }
        Ok(())
    } else {
        anyhow::bail!("file or folder does not exist: {}", path.display())
    }
}

/// Print the `name - size` header line for an entry's primary content.
fn print_header(entry: &Path) -> anyhow::Result<()> {
    let size = fs::metadata(entry)
        .with_context(|| format!("cannot stat {}", entry.display()))?
        .len();
    let name = entry
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| entry.display().to_string());
    println!("{} - {}", name, group_digits(size));
    Ok(())
}

fn list_streams(entry: &Path, json: bool) -> anyhow::Result<()> {
    if json {
        let descriptors: Vec<StreamDescriptor> = list(entry)?.collect();
        println!("{}", serde_json::to_string_pretty(&descriptors)?);
        return Ok(());
    }

    print_header(entry)?;
    for desc in list(entry)? {
        println!("    {} - {}", desc.name, group_digits(desc.size));
    }
    Ok(())
}

fn show_streams(entry: &Path, stream: Option<&str>) -> anyhow::Result<()> {
    print_header(entry)?;
    match stream {
        Some(name) => show_one(entry, name),
        None => {
            // No name supplied means every stream on the entry
            for desc in list(entry)? {
                if let Err(e) = show_one(entry, &desc.name) {
                    eprintln!("error: {}: {:#}", desc.name, e);
                }
            }
            Ok(())
        }
    }
}

fn show_one(entry: &Path, name: &str) -> anyhow::Result<()> {
    let mut handle = StreamHandle::open(entry, name, OpenMode::ReadExisting)?;
    let bytes = handle.read_all()?;
    handle.close()?;
    println!("    {}", name);
    println!("{}", decode_text(&bytes)?);
    Ok(())
}

fn delete_streams(entry: &Path, stream: Option<&str>) -> anyhow::Result<()> {
    print_header(entry)?;
    match stream {
        Some(name) => {
            // The check is a courtesy, not a lock; a concurrent removal
            // still surfaces as StreamNotFound from delete itself
            if exists(entry, name)? {
                delete(entry, name)?;
                println!("    {} deleted", name);
            } else {
                println!("    {} not present", name);
            }
        }
        None => {
            let summary = delete_all(entry)?;
            println!("    {} stream(s) deleted", summary.deleted);
            for failure in &summary.failures {
                eprintln!("error: {}: {}", failure.name, failure.error);
            }
        }
    }
    Ok(())
}

fn write_stream(path: &Path, stream: &str, data: &[u8], append: bool) -> anyhow::Result<()> {
    let mode = if append {
        OpenMode::AppendOrCreate
    } else {
        OpenMode::CreateOrTruncate
    };
    let mut handle = StreamHandle::open(path, stream, mode)
        .with_context(|| format!("cannot open {}:{}", path.display(), stream))?;
    handle.write(data)?;
    handle.close()?;
    println!("{} byte(s) written to {}:{}", data.len(), path.display(), stream);
    Ok(())
}

/// Render a byte count with thousands separators, e.g. 1234567 -> "1,234,567".
fn group_digits(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_digits() {
        assert_eq!(group_digits(0), "0");
        assert_eq!(group_digits(999), "999");
        assert_eq!(group_digits(1000), "1,000");
        assert_eq!(group_digits(12345), "12,345");
        assert_eq!(group_digits(1234567), "1,234,567");
    }
}
