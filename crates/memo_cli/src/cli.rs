//! Command-line argument definitions.

use clap::{Parser, Subcommand};
use memo_core::{Category, CategoryFilter};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "memo", version, about = "Create, tag, search and delete short memos")]
pub struct Cli {
    /// TOML configuration file.
    #[arg(long, global = true, env = "MEMO_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List memos, newest first.
    List {
        /// Category id or `all`.
        #[arg(long, short, value_parser = parse_filter, default_value = "all")]
        category: CategoryFilter,
        /// Case-insensitive text matched against title, content and tags.
        #[arg(long, short)]
        search: Option<String>,
    },
    /// Show one memo.
    Show {
        /// Memo id or unique id prefix.
        id: String,
    },
    /// Create a memo.
    Add {
        #[arg(long, short)]
        title: String,
        #[arg(long, short = 'b')]
        content: String,
        #[arg(long, short, value_parser = parse_category, default_value = "personal")]
        category: Category,
        /// Tag to attach; repeatable.
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Edit a memo; omitted fields keep their current value.
    Edit {
        id: String,
        #[arg(long, short)]
        title: Option<String>,
        #[arg(long, short = 'b')]
        content: Option<String>,
        #[arg(long, short, value_parser = parse_category)]
        category: Option<Category>,
        /// Tag to add; repeatable.
        #[arg(long = "tag")]
        add_tags: Vec<String>,
        /// Tag to remove; repeatable.
        #[arg(long = "remove-tag")]
        remove_tags: Vec<String>,
    },
    /// Delete a memo after confirmation.
    Delete {
        id: String,
        /// Skip the confirmation prompt.
        #[arg(long, short)]
        yes: bool,
    },
    /// Delete every memo.
    Clear {
        #[arg(long, short)]
        yes: bool,
    },
    /// Show memo counts per category.
    Stats,
}

fn parse_category(value: &str) -> Result<Category, String> {
    Category::parse(value).ok_or_else(|| {
        let known: Vec<_> = Category::ALL.iter().map(|category| category.as_str()).collect();
        format!("unknown category `{value}`; expected one of {}", known.join("|"))
    })
}

fn parse_filter(value: &str) -> Result<CategoryFilter, String> {
    CategoryFilter::parse(value)
        .ok_or_else(|| format!("unknown category filter `{value}`"))
}

#[cfg(test)]
mod tests {
    use super::{Cli, Commands};
    use clap::{CommandFactory, Parser};
    use memo_core::{Category, CategoryFilter};

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn add_collects_repeated_tags() {
        let cli = Cli::parse_from([
            "memo", "add", "-t", "title", "-b", "body", "-c", "work", "--tag", "a", "--tag", "b",
        ]);
        match cli.command {
            Commands::Add { category, tags, .. } => {
                assert_eq!(category, Category::Work);
                assert_eq!(tags, vec!["a".to_string(), "b".to_string()]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn list_defaults_to_all_categories() {
        let cli = Cli::parse_from(["memo", "list"]);
        assert!(matches!(
            cli.command,
            Commands::List {
                category: CategoryFilter::All,
                search: None
            }
        ));
        assert!(Cli::try_parse_from(["memo", "list", "-c", "bogus"]).is_err());
    }
}
