//! filehub CLI Client
//!
//! Thin request builder/printer for the file server: one connection per
//! request, prints the server's verdict.

use std::fs;
use std::io::{BufReader, BufWriter};
use std::net::TcpStream;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use filehub::protocol::{
    read_blob, read_string, write_put_payload, write_string, Lookup, Request, Response,
};
use filehub::Result;

/// filehub CLI
#[derive(Parser, Debug)]
#[command(name = "filehub-cli")]
#[command(about = "CLI for the filehub file store")]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:23456")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Upload a local file
    Put {
        /// Local file to upload
        file: PathBuf,

        /// Name to store the file under (server picks one if omitted)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Fetch a file by name or id
    Get {
        /// Fetch by name
        #[arg(long, conflicts_with = "id", required_unless_present = "id")]
        name: Option<String>,

        /// Fetch by numeric id
        #[arg(long)]
        id: Option<u64>,

        /// Where to save the fetched file (defaults to the name or id)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Delete a file by name or id
    Delete {
        /// Delete by name
        #[arg(long, conflicts_with = "id", required_unless_present = "id")]
        name: Option<String>,

        /// Delete by numeric id
        #[arg(long)]
        id: Option<u64>,
    },

    /// Ask the server to shut down
    Exit,
}

fn main() {
    let args = Args::parse();
    if let Err(e) = run(args) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let stream = TcpStream::connect(&args.server)?;
    let mut reader = BufReader::new(stream.try_clone()?);
    let mut writer = BufWriter::new(stream);

    match args.command {
        Commands::Put { file, name } => {
            let content = fs::read(&file)?;
            let request = Request::Put { name };
            write_string(&mut writer, &request.command_line())?;
            write_put_payload(&mut writer, &content)?;

            match Response::parse(&read_string(&mut reader)?)? {
                Response::Ok { id: Some(id) } => println!("File saved with id {}", id),
                Response::Ok { id: None } => println!("File saved"),
                Response::Forbidden => println!("Creating the file was forbidden (name taken)"),
                other => println!("Unexpected response: {}", other.status_line()),
            }
        }
        Commands::Get { name, id, out } => {
            let lookup = to_lookup(name, id);
            let out = out.unwrap_or_else(|| match &lookup {
                Lookup::ByName(name) => PathBuf::from(name),
                Lookup::ById(id) => PathBuf::from(id.to_string()),
            });
            write_string(&mut writer, &Request::Get(lookup).command_line())?;

            match Response::parse(&read_string(&mut reader)?)? {
                Response::Ok { .. } => {
                    let content = read_blob(&mut reader)?;
                    fs::write(&out, &content)?;
                    println!("Saved {} bytes to {}", content.len(), out.display());
                }
                Response::NotFound => println!("File not found"),
                other => println!("Unexpected response: {}", other.status_line()),
            }
        }
        Commands::Delete { name, id } => {
            let lookup = to_lookup(name, id);
            write_string(&mut writer, &Request::Delete(lookup).command_line())?;

            match Response::parse(&read_string(&mut reader)?)? {
                Response::Ok { .. } => println!("File deleted"),
                Response::NotFound => println!("File not found"),
                other => println!("Unexpected response: {}", other.status_line()),
            }
        }
        Commands::Exit => {
            write_string(&mut writer, &Request::Exit.command_line())?;
            match Response::parse(&read_string(&mut reader)?)? {
                Response::Ok { .. } => println!("Server is shutting down"),
                other => println!("Unexpected response: {}", other.status_line()),
            }
        }
    }

    Ok(())
}

/// Clap guarantees exactly one of name/id is present
fn to_lookup(name: Option<String>, id: Option<u64>) -> Lookup {
    match (name, id) {
        (Some(name), _) => Lookup::ByName(name),
        (None, Some(id)) => Lookup::ById(id),
        (None, None) => unreachable!("clap enforces name or id"),
    }
}
