//! Query-string filters for the list endpoints

use serde::Deserialize;

#[derive(Debug, Default, Clone, Deserialize)]
pub struct RecipeQuery {
    #[serde(rename = "author__username")]
    pub author_username: Option<String>,
    pub title: Option<String>,
    pub search: Option<String>,
    pub ordering: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct UserQuery {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub search: Option<String>,
    pub ordering: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct ProfileQuery {
    #[serde(rename = "user__username")]
    pub user_username: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct CommentQuery {
    #[serde(rename = "user__username")]
    pub user_username: Option<String>,
    pub recipe: Option<i64>,
    pub ordering: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct FavoriteQuery {
    #[serde(rename = "user__username")]
    pub user_username: Option<String>,
    pub recipe: Option<i64>,
}
