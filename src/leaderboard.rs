//! Leaderboard: score submission and top-N ranking
//!
//! Two backends share the [`ScoreSubmitter`] seam:
//! - [`Leaderboard`] keeps the top 10 locally (LocalStorage on web)
//! - `remote::RemoteLeaderboard` (web only) posts to a REST table and reads
//!   the ranking back
//!
//! Submission is fire-and-forget. `submit` only reports whether the record
//! could be dispatched; failures after that are logged and never reach the
//! game.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::consts::LEADERBOARD_SIZE;
use crate::error::SubmitError;
use crate::platform;

/// One finished run, as sent to the leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub player_name: String,
    pub score: u32,
}

impl ScoreRecord {
    /// A record worth submitting: non-blank name and a positive score
    pub fn for_run(player_name: &str, score: u32) -> Option<Self> {
        let name = player_name.trim();
        if name.is_empty() || score == 0 {
            return None;
        }
        Some(Self {
            player_name: name.to_string(),
            score,
        })
    }
}

/// A ranked leaderboard row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    #[serde(default)]
    pub id: String,
    pub player_name: String,
    pub score: u32,
    /// ISO-8601 or Unix-ms string, whatever the backend stores
    #[serde(default)]
    pub created_at: String,
}

/// Where finished runs go
pub trait ScoreSubmitter {
    /// Dispatch one record. Must not block on the outcome.
    fn submit(&mut self, record: ScoreRecord) -> Result<(), SubmitError>;
}

impl<T: ScoreSubmitter> ScoreSubmitter for Rc<RefCell<T>> {
    fn submit(&mut self, record: ScoreRecord) -> Result<(), SubmitError> {
        self.borrow_mut().submit(record)
    }
}

/// Top-N table, sorted by score descending
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
    #[serde(skip)]
    persist: bool,
    #[serde(skip)]
    next_id: u64,
}

impl Leaderboard {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "penguin_circuit_leaderboard";

    /// Create empty in-memory leaderboard
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a score would make the table
    pub fn qualifies(&self, score: u32) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < LEADERBOARD_SIZE {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Insert a record if it qualifies. Returns the rank achieved.
    /// Equal scores rank below existing ones.
    pub fn insert(&mut self, record: ScoreRecord, created_at: String) -> Option<usize> {
        if !self.qualifies(record.score) {
            return None;
        }

        self.next_id += 1;
        let entry = LeaderboardEntry {
            id: format!("local-{}", self.next_id),
            player_name: record.player_name,
            score: record.score,
            created_at,
        };

        let pos = self.entries.iter().position(|e| entry.score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(LEADERBOARD_SIZE);
        Some(rank)
    }

    /// Replace the table with rows fetched from a backend
    pub fn replace(&mut self, mut entries: Vec<LeaderboardEntry>) {
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(LEADERBOARD_SIZE);
        self.entries = entries;
    }

    /// Top `n` entries
    pub fn top(&self, n: usize) -> &[LeaderboardEntry] {
        &self.entries[..n.min(self.entries.len())]
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }

    /// Load the local table from LocalStorage; saves go back there
    pub fn load() -> Self {
        let mut board = platform::storage_get(Self::STORAGE_KEY)
            .and_then(|json| Self::restore(&json))
            .unwrap_or_default();
        board.persist = true;
        if board.is_empty() {
            log::info!("No leaderboard found, starting fresh");
        } else {
            log::info!("Loaded {} leaderboard entries", board.entries.len());
        }
        board
    }

    /// Parse a stored table, resuming the id sequence after its highest id
    fn restore(json: &str) -> Option<Self> {
        let mut board: Leaderboard = serde_json::from_str(json).ok()?;
        board.next_id = highest_local_id(&board.entries);
        Some(board)
    }

    pub fn save(&self) {
        if !self.persist {
            return;
        }
        match serde_json::to_string(self) {
            Ok(json) => {
                if platform::storage_set(Self::STORAGE_KEY, &json) {
                    log::info!("Leaderboard saved ({} entries)", self.entries.len());
                }
            }
            Err(e) => log::error!("Failed to serialize leaderboard: {}", e),
        }
    }
}

impl ScoreSubmitter for Leaderboard {
    fn submit(&mut self, record: ScoreRecord) -> Result<(), SubmitError> {
        let created_at = format!("{}", platform::now_ms() as u64);
        match self.insert(record, created_at) {
            Some(rank) => log::info!("New leaderboard entry at rank {}", rank),
            None => log::info!("Score did not make the leaderboard"),
        }
        self.save();
        Ok(())
    }
}

/// Largest `local-N` suffix in use, so fresh ids never collide with loaded ones
fn highest_local_id(entries: &[LeaderboardEntry]) -> u64 {
    entries
        .iter()
        .filter_map(|e| e.id.strip_prefix("local-")?.parse::<u64>().ok())
        .max()
        .unwrap_or(0)
}

/// Query string for the top `n` rows, highest score first
pub fn top_query(n: usize) -> String {
    format!("select=*&order=score.desc&limit={n}")
}

/// REST-table backend (Supabase-style `/rest/v1/<table>`)
#[cfg(target_arch = "wasm32")]
pub mod remote {
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Headers, Request, RequestInit, RequestMode, Response};

    use super::{LeaderboardEntry, ScoreRecord, ScoreSubmitter, top_query};
    use crate::error::SubmitError;

    const TABLE: &str = "leaderboard";

    #[derive(Debug, Clone)]
    pub struct RemoteLeaderboard {
        base_url: String,
        api_key: String,
        /// Called after each successful insert
        on_new_record: Option<fn()>,
    }

    impl RemoteLeaderboard {
        pub fn new(base_url: &str, api_key: &str) -> Self {
            Self {
                base_url: base_url.trim_end_matches('/').to_string(),
                api_key: api_key.to_string(),
                on_new_record: None,
            }
        }

        pub fn on_new_record(mut self, callback: fn()) -> Self {
            self.on_new_record = Some(callback);
            self
        }

        fn table_url(&self) -> String {
            format!("{}/rest/v1/{}", self.base_url, TABLE)
        }

        fn headers(&self) -> Result<Headers, SubmitError> {
            let headers = Headers::new().map_err(js_err)?;
            headers.set("apikey", &self.api_key).map_err(js_err)?;
            headers
                .set("Authorization", &format!("Bearer {}", self.api_key))
                .map_err(js_err)?;
            headers.set("Content-Type", "application/json").map_err(js_err)?;
            Ok(headers)
        }

        async fn send(&self, url: &str, init: RequestInit) -> Result<Response, SubmitError> {
            let window = web_sys::window().ok_or(SubmitError::Unavailable)?;
            let request = Request::new_with_str_and_init(url, &init).map_err(js_err)?;
            let value = JsFuture::from(window.fetch_with_request(&request))
                .await
                .map_err(js_err)?;
            let response: Response = value.dyn_into().map_err(js_err)?;
            if !response.ok() {
                return Err(SubmitError::Status(response.status()));
            }
            Ok(response)
        }

        /// Insert one record
        pub async fn insert(&self, record: &ScoreRecord) -> Result<(), SubmitError> {
            let body = serde_json::to_string(&[record])
                .map_err(|e| SubmitError::Decode(e.to_string()))?;
            let headers = self.headers()?;
            headers.set("Prefer", "return=minimal").map_err(js_err)?;

            let init = RequestInit::new();
            init.set_method("POST");
            init.set_mode(RequestMode::Cors);
            init.set_headers(&headers);
            init.set_body(&JsValue::from_str(&body));

            self.send(&self.table_url(), init).await.map(|_| ())
        }

        /// Top `n` rows by score descending
        pub async fn fetch_top(&self, n: usize) -> Result<Vec<LeaderboardEntry>, SubmitError> {
            let init = RequestInit::new();
            init.set_method("GET");
            init.set_mode(RequestMode::Cors);
            init.set_headers(&self.headers()?);

            let url = format!("{}?{}", self.table_url(), top_query(n));
            let response = self.send(&url, init).await?;
            let text = JsFuture::from(response.text().map_err(js_err)?)
                .await
                .map_err(js_err)?
                .as_string()
                .unwrap_or_default();
            serde_json::from_str(&text).map_err(|e| SubmitError::Decode(e.to_string()))
        }
    }

    impl ScoreSubmitter for RemoteLeaderboard {
        fn submit(&mut self, record: ScoreRecord) -> Result<(), SubmitError> {
            let board = self.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match board.insert(&record).await {
                    Ok(()) => {
                        log::info!("Score {} submitted for {}", record.score, record.player_name);
                        if let Some(callback) = board.on_new_record {
                            callback();
                        }
                    }
                    Err(e) => log::error!("Error saving score: {}", e),
                }
            });
            Ok(())
        }
    }

    fn js_err(value: JsValue) -> SubmitError {
        SubmitError::Transport(format!("{:?}", value))
    }
}
