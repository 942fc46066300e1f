//! 登录会话
//!
//! 只能由登录操作创建；除注册和登录外的所有操作都需要会话。

use crate::search::SearchResults;

#[derive(Debug, Clone)]
pub struct Session {
    user_id: i32,
    username: String,
    first_name: String,
    search: Option<SearchResults>,
}

impl Session {
    pub(crate) fn new(user_id: i32, username: String, first_name: String) -> Self {
        Self {
            user_id,
            username,
            first_name,
            search: None,
        }
    }

    pub fn user_id(&self) -> i32 {
        self.user_id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    /// 缓存最近一次搜索结果
    pub fn cache_search(&mut self, results: SearchResults) {
        self.search = Some(results);
    }

    pub fn search_results(&self) -> Option<&SearchResults> {
        self.search.as_ref()
    }

    pub fn search_results_mut(&mut self) -> Option<&mut SearchResults> {
        self.search.as_mut()
    }
}
