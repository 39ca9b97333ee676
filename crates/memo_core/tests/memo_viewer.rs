use memo_core::service::memo_viewer::DELETE_CONFIRM_PROMPT;
use memo_core::{
    Category, DeleteOutcome, Memo, MemoAdapter, MemoFormData, MemoStore, MemoViewer, NoSeed,
    SqliteMemoRepository, ViewerHost, ViewerKey,
};

#[derive(Default)]
struct RecordingHost {
    scroll_enabled: Vec<bool>,
}

impl RecordingHost {
    fn scroll_is_enabled(&self) -> bool {
        self.scroll_enabled.last().copied().unwrap_or(true)
    }
}

impl ViewerHost for RecordingHost {
    fn set_background_scroll(&mut self, enabled: bool) {
        self.scroll_enabled.push(enabled);
    }
}

fn store_with_memo() -> (MemoStore<SqliteMemoRepository>, Memo) {
    let adapter = MemoAdapter::new(SqliteMemoRepository::open_in_memory().unwrap());
    let mut store = MemoStore::new(adapter);
    store.initialize(&NoSeed);
    let memo = store
        .create_memo(MemoFormData::new("View me", "# Body", Category::Work))
        .unwrap();
    (store, memo)
}

#[test]
fn open_and_close_toggle_background_scroll() {
    let (_store, memo) = store_with_memo();
    let mut host = RecordingHost::default();
    let mut viewer = MemoViewer::new();

    viewer.open(memo.clone(), &mut host);
    assert!(viewer.is_open());
    assert!(!host.scroll_is_enabled());

    viewer.open(memo, &mut host);
    assert_eq!(host.scroll_enabled, vec![false]);

    viewer.close(&mut host);
    assert!(!viewer.is_open());
    assert!(host.scroll_is_enabled());

    viewer.close(&mut host);
    assert_eq!(host.scroll_enabled, vec![false, true]);
}

#[test]
fn escape_closes_only_when_open() {
    let (_store, memo) = store_with_memo();
    let mut host = RecordingHost::default();
    let mut viewer = MemoViewer::new();

    assert!(!viewer.handle_key(ViewerKey::Escape, &mut host));
    viewer.open(memo, &mut host);
    assert!(!viewer.handle_key(ViewerKey::Other, &mut host));
    assert!(viewer.handle_key(ViewerKey::Escape, &mut host));
    assert!(!viewer.is_open());
    assert!(host.scroll_is_enabled());
}

#[test]
fn edit_hands_memo_back_and_closes() {
    let (_store, memo) = store_with_memo();
    let mut host = RecordingHost::default();
    let mut viewer = MemoViewer::new();
    viewer.open(memo.clone(), &mut host);

    assert_eq!(viewer.edit(&mut host), Some(memo));
    assert!(!viewer.is_open());
    assert_eq!(viewer.edit(&mut host), None);
}

#[test]
fn delete_requires_confirmation() {
    let (mut store, memo) = store_with_memo();
    let mut host = RecordingHost::default();
    let mut viewer = MemoViewer::new();
    viewer.open(memo.clone(), &mut host);

    let mut prompts = Vec::new();
    let mut decline = |_: &Memo, prompt: &str| {
        prompts.push(prompt.to_string());
        false
    };
    assert_eq!(
        viewer.delete(&mut store, &mut decline, &mut host),
        DeleteOutcome::Cancelled
    );
    assert_eq!(prompts, vec![DELETE_CONFIRM_PROMPT.to_string()]);
    assert!(viewer.is_open());
    assert!(store.get_memo_by_id(memo.id).is_some());

    let mut accept = |_: &Memo, _: &str| true;
    assert_eq!(
        viewer.delete(&mut store, &mut accept, &mut host),
        DeleteOutcome::Deleted
    );
    assert!(!viewer.is_open());
    assert!(host.scroll_is_enabled());
    assert!(store.get_memo_by_id(memo.id).is_none());

    assert_eq!(
        viewer.delete(&mut store, &mut accept, &mut host),
        DeleteOutcome::NoSelection
    );
}

#[test]
fn display_helpers_use_category_and_timestamps() {
    let (_store, mut memo) = store_with_memo();
    memo.created_at = "2025-08-01T15:04:00.000Z".to_string();
    memo.updated_at = memo.created_at.clone();
    let mut host = RecordingHost::default();
    let mut viewer = MemoViewer::new();
    assert_eq!(viewer.category_label(), None);

    viewer.open(memo.clone(), &mut host);
    assert_eq!(viewer.category_label(), Some("업무"));
    assert_eq!(viewer.category_color(), Some(Category::Work.color()));
    assert_eq!(
        viewer.created_label().as_deref(),
        Some("2025년 8월 1일 오후 03:04")
    );
    assert_eq!(viewer.updated_label(), None);

    memo.updated_at = "2025-08-02T09:00:00.000Z".to_string();
    viewer.open(memo, &mut host);
    assert_eq!(
        viewer.updated_label().as_deref(),
        Some("2025년 8월 2일 오전 09:00")
    );
}
