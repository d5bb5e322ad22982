//! Stored responses, addressed by namespace and request URL.

use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

use super::connection::CacheDb;
use super::hash::compute_entry_key;
use crate::Error;
use crate::message::Response;

/// A response read back from a cache namespace.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedEntry {
    pub cache_name: String,
    pub url: String,
    pub stored_at: String,
    pub response: Response,
}

/// Row data before the response is rebuilt.
struct EntryRow {
    cache_name: String,
    url: String,
    status: u16,
    headers_json: String,
    body: Vec<u8>,
    stored_at: String,
}

/// Header values are stored hex-encoded so opaque (non-UTF-8) bytes survive.
fn encode_headers(headers: &HeaderMap) -> Result<String, Error> {
    let pairs: Vec<(&str, String)> = headers
        .iter()
        .map(|(name, value)| (name.as_str(), hex::encode(value.as_bytes())))
        .collect();
    serde_json::to_string(&pairs).map_err(|e| Error::InvalidInput(format!("unencodable headers: {e}")))
}

fn decode_headers(json: &str) -> Result<HeaderMap, Error> {
    let pairs: Vec<(String, String)> =
        serde_json::from_str(json).map_err(|e| Error::CorruptEntry(format!("headers: {e}")))?;

    let mut headers = HeaderMap::with_capacity(pairs.len());
    for (name, value) in pairs {
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| Error::CorruptEntry(e.to_string()))?;
        let raw = hex::decode(&value).map_err(|e| Error::CorruptEntry(format!("header {name}: {e}")))?;
        let value = HeaderValue::from_bytes(&raw).map_err(|e| Error::CorruptEntry(e.to_string()))?;
        headers.append(name, value);
    }
    Ok(headers)
}

impl EntryRow {
    fn into_entry(self) -> Result<CachedEntry, Error> {
        let status = StatusCode::from_u16(self.status).map_err(|e| Error::CorruptEntry(e.to_string()))?;
        let headers = decode_headers(&self.headers_json)?;
        Ok(CachedEntry {
            cache_name: self.cache_name,
            url: self.url,
            stored_at: self.stored_at,
            response: Response::new(status, headers, self.body),
        })
    }
}

impl CacheDb {
    /// Store `response` for `url` in `cache_name`, replacing any previous entry.
    pub async fn put(&self, cache_name: &str, url: &str, response: &Response) -> Result<(), Error> {
        let key = compute_entry_key(cache_name, url);
        let cache_name = cache_name.to_string();
        let url = url.to_string();
        let status = response.status.as_u16();
        let headers_json = encode_headers(&response.headers)?;
        let body = response.body.to_vec();
        let stored_at = chrono::Utc::now().to_rfc3339();

        tracing::debug!(cache_name = %cache_name, url = %url, bytes = body.len(), "storing cache entry");

        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO cache_entries (entry_key, cache_name, url, status, headers_json, body, stored_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                     ON CONFLICT(entry_key) DO UPDATE SET
                        status = excluded.status,
                        headers_json = excluded.headers_json,
                        body = excluded.body,
                        stored_at = excluded.stored_at",
                    params![key, cache_name, url, status, headers_json, body, stored_at],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Look up the entry for `url` in `cache_name`.
    ///
    /// Returns None on a cache miss.
    pub async fn match_entry(&self, cache_name: &str, url: &str) -> Result<Option<CachedEntry>, Error> {
        let key = compute_entry_key(cache_name, url);
        let row = self
            .conn
            .call(move |conn| -> Result<Option<EntryRow>, Error> {
                let result = conn.query_row(
                    "SELECT cache_name, url, status, headers_json, body, stored_at
                     FROM cache_entries WHERE entry_key = ?1",
                    params![key],
                    |row| {
                        Ok(EntryRow {
                            cache_name: row.get(0)?,
                            url: row.get(1)?,
                            status: row.get(2)?,
                            headers_json: row.get(3)?,
                            body: row.get(4)?,
                            stored_at: row.get(5)?,
                        })
                    },
                );

                match result {
                    Ok(row) => Ok(Some(row)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)?;

        row.map(EntryRow::into_entry).transpose()
    }

    /// Remove the entry for `url` in `cache_name`.
    ///
    /// Returns whether an entry existed.
    pub async fn delete_entry(&self, cache_name: &str, url: &str) -> Result<bool, Error> {
        let key = compute_entry_key(cache_name, url);
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let deleted = conn.execute("DELETE FROM cache_entries WHERE entry_key = ?1", params![key])?;
                Ok(deleted > 0)
            })
            .await
            .map_err(Error::from)
    }

    /// URLs stored in `cache_name`, oldest first.
    pub async fn keys(&self, cache_name: &str) -> Result<Vec<String>, Error> {
        let cache_name = cache_name.to_string();
        self.conn
            .call(move |conn| -> Result<Vec<String>, Error> {
                let mut stmt =
                    conn.prepare("SELECT url FROM cache_entries WHERE cache_name = ?1 ORDER BY stored_at ASC, url ASC")?;
                let urls = stmt
                    .query_map(params![cache_name], |row| row.get(0))?
                    .collect::<Result<Vec<String>, _>>()?;
                Ok(urls)
            })
            .await
            .map_err(Error::from)
    }

    /// Number of entries in `cache_name`.
    pub async fn count(&self, cache_name: &str) -> Result<u64, Error> {
        let cache_name = cache_name.to_string();
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count: i64 = conn.query_row(
                    "SELECT COUNT(*) FROM cache_entries WHERE cache_name = ?1",
                    params![cache_name],
                    |row| row.get(0),
                )?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }

    /// Drop every entry in `cache_name`.
    ///
    /// Returns the number of deleted entries.
    pub async fn clear(&self, cache_name: &str) -> Result<u64, Error> {
        let cache_name = cache_name.to_string();
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let deleted = conn.execute("DELETE FROM cache_entries WHERE cache_name = ?1", params![cache_name])?;
                Ok(deleted as u64)
            })
            .await
            .map_err(Error::from)
    }
}
