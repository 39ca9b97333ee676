//! Subcommand handlers driving the core store, form and viewer.

use crate::cli::Commands;
use anyhow::{anyhow, bail, Context, Result};
use dialoguer::Confirm;
use log::debug;
use memo_core::display::{format_timestamp, markdown_preview};
use memo_core::{
    Category, DeleteOutcome, Memo, MemoForm, MemoId, MemoRepository, MemoStore,
    MemoViewer, TagInputError, ViewerHost,
};

pub type CliStore = MemoStore<Box<dyn MemoRepository>>;

/// Terminal stand-in for the page hosting the viewer.
struct TerminalHost;

impl ViewerHost for TerminalHost {
    fn set_background_scroll(&mut self, enabled: bool) {
        debug!("event=viewer_scroll module=cli status=ok enabled={enabled}");
    }
}

pub fn run(store: &mut CliStore, command: Commands) -> Result<()> {
    match command {
        Commands::List { category, search } => {
            store.filter_by_category(category);
            if let Some(query) = search {
                store.search(query);
            }
            print_list(store);
            Ok(())
        }
        Commands::Show { id } => {
            let memo = find_memo(store, &id)?.clone();
            let mut viewer = MemoViewer::new();
            viewer.open(memo, &mut TerminalHost);
            print_viewer(&viewer);
            viewer.close(&mut TerminalHost);
            Ok(())
        }
        Commands::Add {
            title,
            content,
            category,
            tags,
        } => {
            let mut form = MemoForm::new();
            form.open_new();
            form.set_title(title);
            form.set_content(content);
            form.set_category(category);
            push_tags(&mut form, tags);

            let submission = form.submit().map_err(|err| anyhow!(err.user_message()))?;
            let created = store
                .create_memo(submission.data)
                .ok_or_else(|| anyhow!("failed to save memo; see log for details"))?;
            println!("created {}", created.id);
            Ok(())
        }
        Commands::Edit {
            id,
            title,
            content,
            category,
            add_tags,
            remove_tags,
        } => {
            let memo = find_memo(store, &id)?.clone();
            let mut form = MemoForm::new();
            form.open_edit(&memo);
            if let Some(title) = title {
                form.set_title(title);
            }
            if let Some(content) = content {
                form.set_content(content);
            }
            if let Some(category) = category {
                form.set_category(category);
            }
            for tag in remove_tags {
                if !form.remove_tag(&tag) {
                    eprintln!("warning: tag `{tag}` not present");
                }
            }
            push_tags(&mut form, add_tags);

            let submission = form.submit().map_err(|err| anyhow!(err.user_message()))?;
            let target = submission.editing.unwrap_or(memo.id);
            if !store.update_memo(target, submission.data) {
                bail!("failed to update memo {target}; see log for details");
            }
            println!("updated {target}");
            Ok(())
        }
        Commands::Delete { id, yes } => {
            let memo = find_memo(store, &id)?.clone();
            let memo_id = memo.id;
            let mut viewer = MemoViewer::new();
            viewer.open(memo, &mut TerminalHost);
            let mut confirm = |memo: &Memo, prompt: &str| {
                yes || ask(&format!("{prompt} ({})", memo.title))
            };
            match viewer.delete(store, &mut confirm, &mut TerminalHost) {
                DeleteOutcome::Deleted => {
                    println!("deleted {memo_id}");
                    Ok(())
                }
                DeleteOutcome::Cancelled => {
                    viewer.close(&mut TerminalHost);
                    println!("cancelled");
                    Ok(())
                }
                DeleteOutcome::Failed => {
                    bail!("failed to delete memo {memo_id}; see log for details")
                }
                DeleteOutcome::NoSelection => bail!("no memo selected"),
            }
        }
        Commands::Clear { yes } => {
            let total = store.all_memos().len();
            if !yes && !ask(&format!("모든 메모({total}개)를 삭제하시겠습니까?")) {
                println!("cancelled");
                return Ok(());
            }
            if !store.clear_all_memos() {
                bail!("failed to clear memos; see log for details");
            }
            println!("cleared {total} memos");
            Ok(())
        }
        Commands::Stats => {
            let stats = store.stats();
            println!("total: {}", stats.total);
            for category in Category::ALL {
                let count = stats.by_category.get(&category).copied().unwrap_or(0);
                println!("{:<10} {:>4}", category.label(), count);
            }
            Ok(())
        }
    }
}

fn push_tags(form: &mut MemoForm, tags: Vec<String>) {
    for tag in tags {
        form.set_tag_input(tag);
        match form.add_tag() {
            Ok(()) | Err(TagInputError::Empty) => {}
            Err(TagInputError::Duplicate(tag)) => {
                eprintln!("warning: duplicate tag `{tag}` ignored")
            }
        }
    }
}

/// Resolves a full id or a unique id prefix against the loaded memos.
fn find_memo<'a>(store: &'a CliStore, raw: &str) -> Result<&'a Memo> {
    let needle = raw.trim().to_ascii_lowercase();
    if needle.is_empty() {
        bail!("memo id must not be empty");
    }
    if let Ok(id) = needle.parse::<MemoId>() {
        return store
            .get_memo_by_id(id)
            .with_context(|| format!("memo {id} not found"));
    }

    let mut matches = store
        .all_memos()
        .iter()
        .filter(|memo| memo.id.to_string().starts_with(&needle));
    let first = matches
        .next()
        .with_context(|| format!("no memo id starts with `{raw}`"))?;
    if matches.next().is_some() {
        bail!("memo id prefix `{raw}` is ambiguous");
    }
    Ok(first)
}

fn ask(prompt: &str) -> bool {
    Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .unwrap_or(false)
}

fn print_list(store: &CliStore) {
    let memos = store.filtered_memos();
    if memos.is_empty() {
        println!("no memos");
        return;
    }
    for memo in &memos {
        let short_id: String = memo.id.to_string().chars().take(8).collect();
        println!(
            "{short_id}  [{}] {}  ({})",
            memo.category.label(),
            memo.title,
            format_timestamp(&memo.created_at)
        );
        if let Some(preview) = markdown_preview(&memo.content) {
            println!("          {preview}");
        }
        if !memo.tags.is_empty() {
            println!("          #{}", memo.tags.join(" #"));
        }
    }
    let stats = store.stats();
    println!("{} of {} memos", stats.filtered, stats.total);
}

fn print_viewer(viewer: &MemoViewer) {
    let Some(memo) = viewer.memo() else {
        return;
    };
    println!("{}", memo.title);
    println!(
        "[{}] {}",
        viewer.category_label().unwrap_or_default(),
        memo.id
    );
    if let Some(created) = viewer.created_label() {
        println!("작성: {created}");
    }
    if let Some(updated) = viewer.updated_label() {
        println!("수정: {updated}");
    }
    if !memo.tags.is_empty() {
        println!("#{}", memo.tags.join(" #"));
    }
    println!();
    println!("{}", memo.content);
}

#[cfg(test)]
mod tests {
    use super::{find_memo, run, CliStore};
    use crate::cli::Commands;
    use memo_core::service::memo_form::MISSING_FIELDS_MESSAGE;
    use memo_core::{
        Category, CategoryFilter, MemoAdapter, MemoFormData, MemoRepository, MemoStore, NoSeed,
        SqliteMemoRepository,
    };
    use std::collections::HashMap;

    fn store() -> CliStore {
        let repo: Box<dyn MemoRepository> =
            Box::new(SqliteMemoRepository::open_in_memory().unwrap());
        let mut store = MemoStore::new(MemoAdapter::new(repo));
        store.initialize(&NoSeed);
        store
    }

    fn seed(store: &mut CliStore, title: &str, tags: &[&str]) -> memo_core::Memo {
        store
            .create_memo(
                MemoFormData::new(title, "body", Category::Work).with_tags(tags.iter().copied()),
            )
            .unwrap()
    }

    #[test]
    fn find_memo_resolves_full_id_and_unique_prefix() {
        let mut store = store();
        let memo = seed(&mut store, "target", &[]);
        let full = memo.id.to_string();

        assert_eq!(find_memo(&store, &full).unwrap().id, memo.id);
        assert_eq!(find_memo(&store, &full.to_uppercase()).unwrap().id, memo.id);
        assert_eq!(find_memo(&store, &full[..8]).unwrap().id, memo.id);
        assert!(find_memo(&store, "zzz").is_err());
        assert!(find_memo(&store, "  ").is_err());
    }

    #[test]
    fn find_memo_rejects_ambiguous_prefix() {
        let mut store = store();
        // 17 random ids guarantee two share a leading hex digit.
        for idx in 0..17 {
            seed(&mut store, &format!("memo {idx}"), &[]);
        }
        let mut by_first: HashMap<char, usize> = HashMap::new();
        for memo in store.all_memos() {
            let first = memo.id.to_string().chars().next().unwrap();
            *by_first.entry(first).or_insert(0) += 1;
        }
        let (shared, _) = by_first.iter().find(|(_, count)| **count > 1).unwrap();

        let err = find_memo(&store, &shared.to_string()).unwrap_err();
        assert!(err.to_string().contains("ambiguous"));
    }

    #[test]
    fn add_creates_memo_through_form() {
        let mut store = store();
        run(
            &mut store,
            Commands::Add {
                title: "장보기".to_string(),
                content: "우유".to_string(),
                category: Category::Personal,
                tags: vec!["a".to_string(), "a".to_string(), " ".to_string()],
            },
        )
        .unwrap();

        let created = &store.all_memos()[0];
        assert_eq!(created.title, "장보기");
        assert_eq!(created.tags, vec!["a".to_string()]);
        assert_eq!(store.adapter().count(), Some(1));
    }

    #[test]
    fn add_with_blank_content_reports_form_message() {
        let mut store = store();
        let err = run(
            &mut store,
            Commands::Add {
                title: "title".to_string(),
                content: "   ".to_string(),
                category: Category::Work,
                tags: Vec::new(),
            },
        )
        .unwrap_err();
        assert_eq!(err.to_string(), MISSING_FIELDS_MESSAGE);
        assert!(store.all_memos().is_empty());
    }

    #[test]
    fn edit_keeps_omitted_fields_and_removes_tags_before_adding() {
        let mut store = store();
        let memo = seed(&mut store, "keep title", &["a", "b"]);

        run(
            &mut store,
            Commands::Edit {
                id: memo.id.to_string()[..8].to_string(),
                title: None,
                content: Some("new body".to_string()),
                category: None,
                add_tags: vec!["a".to_string(), "c".to_string()],
                remove_tags: vec!["a".to_string()],
            },
        )
        .unwrap();

        let edited = store.adapter().get(memo.id).unwrap();
        assert_eq!(edited.title, "keep title");
        assert_eq!(edited.content, "new body");
        assert_eq!(edited.category, Category::Work);
        assert_eq!(
            edited.tags,
            vec!["b".to_string(), "a".to_string(), "c".to_string()]
        );
        assert_eq!(edited.created_at, memo.created_at);
        assert_eq!(store.get_memo_by_id(memo.id), Some(&edited));
    }

    #[test]
    fn delete_with_yes_skips_prompt() {
        let mut store = store();
        let keep = seed(&mut store, "keep", &[]);
        let gone = seed(&mut store, "gone", &[]);

        run(
            &mut store,
            Commands::Delete {
                id: gone.id.to_string(),
                yes: true,
            },
        )
        .unwrap();

        assert!(store.get_memo_by_id(gone.id).is_none());
        assert!(store.adapter().get(gone.id).is_none());
        assert!(store.get_memo_by_id(keep.id).is_some());
    }

    #[test]
    fn clear_with_yes_empties_store_and_backend() {
        let mut store = store();
        seed(&mut store, "one", &[]);
        seed(&mut store, "two", &[]);

        run(&mut store, Commands::Clear { yes: true }).unwrap();

        assert!(store.all_memos().is_empty());
        assert_eq!(store.adapter().count(), Some(0));
    }

    #[test]
    fn list_applies_category_and_search_to_store() {
        let mut store = store();
        seed(&mut store, "rust notes", &[]);

        run(
            &mut store,
            Commands::List {
                category: CategoryFilter::Only(Category::Work),
                search: Some("RUST".to_string()),
            },
        )
        .unwrap();

        assert_eq!(store.selected_category(), CategoryFilter::Only(Category::Work));
        assert_eq!(store.filtered_memos().len(), 1);
    }
}
