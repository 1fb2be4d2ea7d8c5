use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use rocket::http::{Cookie, SameSite};
use rocket::request::{FromRequest, Outcome};
use rocket::Request;
use time::{Duration, OffsetDateTime};
use tracing::{debug, warn};
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "scorecard_session";
pub const DEFAULT_SESSION_TTL_MINUTES: i64 = 14 * 24 * 60;
pub const MAX_SESSION_TTL_MINUTES: i64 = 365 * 24 * 60;
pub const MAX_SESSIONS: usize = 10000;

#[derive(Debug)]
struct SessionEntry {
    has_voted: bool,
    last_seen: OffsetDateTime,
    written: u64,
}

#[derive(Debug, Default)]
struct Sessions {
    entries: HashMap<Uuid, SessionEntry>,
    writes: u64,
}

/// Per-client key/value bag, keyed by the id carried in the session cookie.
/// Holds at most `capacity` sessions; the least recently written one is
/// evicted to make room.
#[derive(Debug)]
pub struct SessionStore {
    sessions: Mutex<Sessions>,
    ttl: Duration,
    capacity: usize,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_TTL_MINUTES)
    }
}

impl SessionStore {
    pub fn new(ttl_minutes: i64) -> Self {
        Self::with_capacity(ttl_minutes, MAX_SESSIONS)
    }

    pub fn with_capacity(ttl_minutes: i64, capacity: usize) -> Self {
        if ttl_minutes > MAX_SESSION_TTL_MINUTES {
            warn!("Session TTL of {} minutes capped at {}", ttl_minutes, MAX_SESSION_TTL_MINUTES);
        }
        Self {
            sessions: Mutex::new(Sessions::default()),
            ttl: Duration::minutes(ttl_minutes.clamp(-MAX_SESSION_TTL_MINUTES, MAX_SESSION_TTL_MINUTES)),
            capacity: capacity.max(1),
        }
    }

    fn sessions(&self) -> MutexGuard<'_, Sessions> {
        // a plain flag map cannot be left half-written, so recover from poisoning
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, session: Uuid, default: bool) -> bool {
        let now = OffsetDateTime::now_utc();
        self.sessions()
            .entries
            .get(&session)
            .filter(|entry| now - entry.last_seen <= self.ttl)
            .map_or(default, |entry| entry.has_voted)
    }

    pub fn set(&self, session: Uuid, value: bool) {
        let now = OffsetDateTime::now_utc();
        let mut sessions = self.sessions();
        sessions.entries.retain(|_, entry| now - entry.last_seen <= self.ttl);

        if sessions.entries.len() >= self.capacity && !sessions.entries.contains_key(&session) {
            let oldest = sessions.entries
                .iter()
                .min_by_key(|(_, entry)| entry.written)
                .map(|(id, _)| *id);
            if let Some(oldest) = oldest {
                debug!("Session store full, evicting session {}", oldest);
                sessions.entries.remove(&oldest);
            }
        }

        sessions.writes += 1;
        let written = sessions.writes;
        sessions.entries.insert(session, SessionEntry { has_voted: value, last_seen: now, written });
    }

    pub(crate) fn len(&self) -> usize {
        self.sessions().entries.len()
    }
}

/// Gate against repeat voting within one client session.
pub struct SessionVoteGuard;

impl SessionVoteGuard {
    pub fn has_voted(store: &SessionStore, session: Uuid) -> bool {
        store.get(session, false)
    }

    pub fn set_voted(store: &SessionStore, session: Uuid, flag: bool) {
        debug!("Session {} voted flag set to {}", session, flag);
        store.set(session, flag);
    }
}

/// Identifies the calling client. A fresh id and cookie are issued when the
/// request carries none or an unparsable one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientSession {
    pub id: Uuid,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for ClientSession {
    type Error = std::convert::Infallible;

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let cookies = req.cookies();
        if let Some(id) = cookies
            .get(SESSION_COOKIE)
            .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
        {
            return Outcome::Success(ClientSession { id });
        }

        let id = Uuid::new_v4();
        debug!("Issuing new session {}", id);
        cookies.add(
            Cookie::build((SESSION_COOKIE, id.to_string()))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax),
        );
        Outcome::Success(ClientSession { id })
    }
}
