//! The fixed course category list and the routine that installs it.

use crate::error::AppError;
use crate::model::NewCategory;
use crate::store::CategoryStore;

/// `(name, slug)` of every category. Descriptions are empty.
pub const CATEGORIES: [(&str, &str); 11] = [
    ("개발 프로그래밍", "it-programming"),
    ("게임 개발", "game-dev-all"),
    ("데이터 사이언스", "data-science"),
    ("인공지능", "artificial-intelligence"),
    ("보안 네트워크", "it"),
    ("하드웨어", "hardware"),
    ("디자인 아트", "design"),
    ("기획 경영 마케팅", "business"),
    ("업무 생산성", "productivity"),
    ("커리어 자기계발", "career"),
    ("대학 교육", "academics"),
];

pub fn default_categories() -> Vec<NewCategory> {
    CATEGORIES
        .iter()
        .map(|(name, slug)| NewCategory {
            name: (*name).to_string(),
            slug: (*slug).to_string(),
            description: String::new(),
        })
        .collect()
}

/// Replace every category with the fixed list. Returns the number of rows inserted.
pub async fn seed_categories(categories: &dyn CategoryStore) -> Result<u64, AppError> {
    let inserted = categories.replace_all(&default_categories()).await?;
    tracing::info!(inserted, "course categories seeded");
    Ok(inserted)
}
