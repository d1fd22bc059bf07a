use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use http::StatusCode;

use crate::fetch::{Fetch, FetchError};

type Reply = Result<StatusCode, FetchError>;

/// Replays a fixed script of replies; the last reply repeats forever.
pub struct ScriptedFetcher {
    script: Mutex<VecDeque<Reply>>,
    log: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    pub fn new(script: Vec<Reply>) -> Self {
        assert!(!script.is_empty(), "script needs at least one reply");
        Self {
            script: Mutex::new(script.into()),
            log: Mutex::new(Vec::new()),
        }
    }

    pub fn always(reply: Reply) -> Self {
        Self::new(vec![reply])
    }

    pub fn calls(&self) -> u32 {
        self.log.lock().unwrap().len() as u32
    }
}

impl Fetch for ScriptedFetcher {
    async fn get(&self, url: &str) -> Reply {
        self.log.lock().unwrap().push(url.to_string());
        let mut script = self.script.lock().unwrap();
        if script.len() > 1 {
            script.pop_front().unwrap()
        } else {
            script.front().cloned().unwrap()
        }
    }
}

/// Answers with a fixed status per URL and records the order of requests.
pub struct RoutedFetcher {
    routes: HashMap<String, StatusCode>,
    log: Mutex<Vec<String>>,
}

impl RoutedFetcher {
    pub fn new(routes: &[(&str, StatusCode)]) -> Self {
        Self {
            routes: routes.iter().map(|(u, s)| (u.to_string(), *s)).collect(),
            log: Mutex::new(Vec::new()),
        }
    }

    pub fn requested(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }
}

impl Fetch for RoutedFetcher {
    async fn get(&self, url: &str) -> Reply {
        self.log.lock().unwrap().push(url.to_string());
        self.routes
            .get(url)
            .copied()
            .ok_or_else(|| FetchError::Transport(format!("no route to {url}")))
    }
}
