//! First-run sample memos.
//!
//! # Invariants
//! - Seeding only writes when the backend reports zero memos.
//! - Sample timestamps are spaced one minute apart so list order is stable.

use crate::model::category::Category;
use crate::model::memo::{Memo, MemoFormData};
use crate::model::timestamp;
use crate::repo::memo_repo::MemoRepository;
use crate::service::memo_adapter::MemoAdapter;
use chrono::{Duration, Utc};
use log::{info, warn};
use uuid::Uuid;

/// Seeding hook run once during store initialization.
pub trait SampleSeeder {
    /// Seeds `adapter` and returns the number of inserted memos.
    fn seed<R: MemoRepository>(&self, adapter: &MemoAdapter<R>) -> usize;
}

/// Seeder that never writes.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSeed;

impl SampleSeeder for NoSeed {
    fn seed<R: MemoRepository>(&self, _adapter: &MemoAdapter<R>) -> usize {
        0
    }
}

/// Built-in sample memo set.
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleData;

impl SampleData {
    /// Returns the sample payloads, oldest first.
    pub fn payloads() -> Vec<MemoFormData> {
        vec![
            MemoFormData::new(
                "메모 앱에 오신 것을 환영합니다",
                "# 시작하기\n\n메모를 **작성**, 편집, 검색하고 카테고리와 태그로 정리해 보세요.",
                Category::Personal,
            )
            .with_tags(["환영", "가이드"]),
            MemoFormData::new(
                "주간 회의 안건",
                "- 지난주 진행 상황 공유\n- 배포 일정 확인\n- 다음 스프린트 목표 정리",
                Category::Work,
            )
            .with_tags(["회의", "업무"]),
            MemoFormData::new(
                "Rust 소유권 정리",
                "값에는 하나의 소유자만 있고, 빌림은 `&T` 여러 개 또는 `&mut T` 하나만 허용된다.",
                Category::Study,
            )
            .with_tags(["rust", "공부"]),
            MemoFormData::new(
                "사이드 프로젝트 아이디어",
                "오프라인에서도 동작하는 마크다운 메모 앱. 로컬 저장소와 서버 저장소를 교체 가능하게.",
                Category::Idea,
            )
            .with_tags(["아이디어"]),
        ]
    }
}

impl SampleSeeder for SampleData {
    fn seed<R: MemoRepository>(&self, adapter: &MemoAdapter<R>) -> usize {
        match adapter.count() {
            Some(0) => {}
            Some(existing) => {
                info!("event=seed module=store status=skipped existing={existing}");
                return 0;
            }
            None => {
                warn!("event=seed module=store status=skipped reason=count_unavailable");
                return 0;
            }
        }

        let payloads = Self::payloads();
        let base = Utc::now() - Duration::minutes(payloads.len() as i64);
        let mut inserted = 0;
        for (offset, payload) in payloads.into_iter().enumerate() {
            let created_at = timestamp::format(base + Duration::minutes(offset as i64));
            let memo = Memo::with_id(Uuid::new_v4(), payload, created_at);
            if adapter.create(&memo).is_some() {
                inserted += 1;
            }
        }

        info!("event=seed module=store status=ok inserted={inserted}");
        inserted
    }
}
