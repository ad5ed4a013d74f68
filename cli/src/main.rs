mod client;

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use recetas_core::{parse_recipe, StoredRecipe};

use client::RecetasClient;

#[derive(Parser)]
#[command(name = "recetas")]
#[command(about = "Recetas CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse generated recipe text and print the result as JSON
    Parse {
        /// File with the generated text (reads stdin if omitted)
        file: Option<PathBuf>,
    },
    /// Ask the server to generate and store a recipe
    Generate {
        /// Server URL (default: http://localhost:5000)
        #[arg(long, env = "RECETAS_SERVER", default_value = "http://localhost:5000")]
        server: String,
        /// Comma-separated ingredients
        #[arg(long)]
        ingredients: String,
        /// Comma-separated dietary restrictions
        #[arg(long)]
        restrictions: Option<String>,
        /// Free-form preferences
        #[arg(long)]
        preferences: Option<String>,
    },
    /// List stored recipes, newest first
    List {
        /// Server URL (default: http://localhost:5000)
        #[arg(long, env = "RECETAS_SERVER", default_value = "http://localhost:5000")]
        server: String,
        /// Page size (the server clamps it to 1..=50)
        #[arg(long)]
        limit: Option<u32>,
        /// Cursor from a previous page
        #[arg(long)]
        cursor: Option<String>,
    },
    /// Like a recipe
    Like {
        /// Server URL (default: http://localhost:5000)
        #[arg(long, env = "RECETAS_SERVER", default_value = "http://localhost:5000")]
        server: String,
        /// Recipe ID
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Parse { file } => {
            let text = read_input(file)?;
            let draft = parse_recipe(&text);
            println!("{}", serde_json::to_string_pretty(&draft)?);
        }
        Commands::Generate {
            server,
            ingredients,
            restrictions,
            preferences,
        } => {
            let recipe = RecetasClient::new(&server)
                .generate(&ingredients, restrictions.as_deref(), preferences.as_deref())
                .await?;
            print_recipe(&recipe);
        }
        Commands::List {
            server,
            limit,
            cursor,
        } => {
            let page = RecetasClient::new(&server)
                .list(limit, cursor.as_deref())
                .await?;
            for recipe in &page.data {
                println!(
                    "{:>5}  {}  {} ({} likes)",
                    recipe.id.to_string(),
                    recipe.created_at.format("%Y-%m-%d %H:%M"),
                    recipe.title,
                    recipe.likes
                );
            }
            if let Some(cursor) = page.next_cursor {
                println!("\nMore recipes available: --cursor {}", cursor);
            }
        }
        Commands::Like { server, id } => {
            let recipe = RecetasClient::new(&server).like(&id).await?;
            println!("{} now has {} likes", recipe.title, recipe.likes);
        }
    }

    Ok(())
}

fn read_input(file: Option<PathBuf>) -> Result<String> {
    match file {
        Some(path) => {
            fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))
        }
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            Ok(text)
        }
    }
}

fn print_recipe(recipe: &StoredRecipe) {
    println!("#{} {}\n", recipe.id, recipe.title);
    println!("Ingredientes:");
    for item in &recipe.ingredients {
        println!("  - {}", item);
    }
    println!("\nInstrucciones:");
    for (i, step) in recipe.instructions.iter().enumerate() {
        println!("  {}. {}", i + 1, step);
    }
}
