//! SQLite-backed vector store for the form and legislation corpora.
//!
//! Vectors live in sibling `*_embeddings` tables as `vec_f32` blobs and are
//! ranked with `vec_distance_cosine` (ascending: lower distance is better).
//! Dedup is enforced twice: callers check existence before paying for an
//! embedding, and UNIQUE constraints with `INSERT OR IGNORE` backstop the
//! write inside the transaction. Two ingestion processes sharing one
//! database file are not guarded beyond the constraints themselves.
//!
//! Embeddings are always computed before a `conn.call` closure is entered;
//! the store never holds the connection across a provider round trip.

use rustc_hash::FxHashMap;
use std::mem::transmute;
use std::os::raw::c_char;
use std::path::Path;
use std::sync::Once;
use tokio_rusqlite::{Connection, OptionalExtension, ffi};

use super::types::{
    ContentKind, FormDetails, LegislationDetails, RagError, SearchResult, SourceDetails,
};

/// Parent row for a form family (one per metadata file).
#[derive(Clone, Debug)]
pub struct FormRow {
    pub form_id: String,
    pub title: String,
    pub link: String,
    pub description: String,
}

/// One physical document belonging to a form (the form PDF itself, or an
/// instructions PDF).
#[derive(Clone, Debug)]
pub struct FormDocumentRow {
    pub form_id: String,
    pub file_name: String,
    pub url: Option<String>,
    pub title: String,
}

/// Where a form chunk came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChunkSource {
    /// Page of the primary form PDF.
    Pdf,
    /// Page of an instructions PDF; kept out of the primary chunk set.
    Instructions,
    /// Sibling HTML page.
    Html,
}

impl ChunkSource {
    fn as_str(self) -> &'static str {
        match self {
            ChunkSource::Pdf => "pdf",
            ChunkSource::Instructions => "instructions",
            ChunkSource::Html => "html",
        }
    }
}

/// One fee line for a form filing category.
#[derive(Clone, Debug)]
pub struct FilingRow {
    pub category: String,
    pub paper_fee: Option<String>,
    pub online_fee: Option<String>,
}

/// Parent row for a piece of legislation, keyed by (act, code).
#[derive(Clone, Debug)]
pub struct LegislationRow {
    pub act: String,
    pub code: String,
    pub link: String,
    pub description: String,
}

/// Row counts per table, used to verify ingestion idempotence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StoreCounts {
    pub forms: usize,
    pub form_documents: usize,
    pub form_chunks: usize,
    pub form_filings: usize,
    pub legislation: usize,
    pub legislation_chunks: usize,
}

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS forms (
    form_id     TEXT PRIMARY KEY,
    title       TEXT NOT NULL,
    link        TEXT NOT NULL,
    description TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS form_embeddings (
    form_id   TEXT PRIMARY KEY,
    embedding BLOB NOT NULL
);
CREATE TABLE IF NOT EXISTS form_documents (
    form_id   TEXT NOT NULL,
    file_name TEXT NOT NULL,
    url       TEXT,
    title     TEXT NOT NULL,
    UNIQUE(form_id, file_name)
);
CREATE TABLE IF NOT EXISTS form_chunks (
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    form_id   TEXT NOT NULL,
    file_name TEXT NOT NULL,
    source    TEXT NOT NULL,
    content   TEXT NOT NULL,
    UNIQUE(form_id, content)
);
CREATE TABLE IF NOT EXISTS form_chunk_embeddings (
    chunk_id  INTEGER PRIMARY KEY,
    embedding BLOB NOT NULL
);
CREATE TABLE IF NOT EXISTS form_filings (
    form_id    TEXT NOT NULL,
    topic_id   TEXT NOT NULL,
    category   TEXT NOT NULL,
    paper_fee  TEXT,
    online_fee TEXT,
    UNIQUE(form_id, topic_id, category)
);
CREATE TABLE IF NOT EXISTS legislation (
    act         TEXT NOT NULL,
    code        TEXT NOT NULL,
    link        TEXT NOT NULL,
    description TEXT NOT NULL,
    UNIQUE(act, code)
);
CREATE TABLE IF NOT EXISTS legislation_embeddings (
    act       TEXT NOT NULL,
    code      TEXT NOT NULL,
    embedding BLOB NOT NULL,
    UNIQUE(act, code)
);
CREATE TABLE IF NOT EXISTS legislation_chunks (
    id      INTEGER PRIMARY KEY AUTOINCREMENT,
    act     TEXT NOT NULL,
    code    TEXT NOT NULL,
    content TEXT NOT NULL,
    UNIQUE(act, code, content)
);
CREATE TABLE IF NOT EXISTS legislation_chunk_embeddings (
    chunk_id  INTEGER PRIMARY KEY,
    embedding BLOB NOT NULL
);
";

#[derive(Clone)]
pub struct VectorStore {
    conn: Connection,
}

impl VectorStore {
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, RagError> {
        Self::register_sqlite_vec()?;
        let conn = Connection::open(path)
            .await
            .map_err(|err| RagError::Storage(err.to_string()))?;
        Self::from_connection(conn).await
    }

    /// In-memory store for tests and scratch work.
    pub async fn open_in_memory() -> Result<Self, RagError> {
        Self::register_sqlite_vec()?;
        let conn = Connection::open_in_memory()
            .await
            .map_err(|err| RagError::Storage(err.to_string()))?;
        Self::from_connection(conn).await
    }

    async fn from_connection(conn: Connection) -> Result<Self, RagError> {
        conn.call(|conn| {
            conn.query_row("select vec_version()", [], |row| row.get::<_, String>(0))
                .map_err(tokio_rusqlite::Error::Rusqlite)?;
            conn.execute_batch(SCHEMA)
                .map_err(tokio_rusqlite::Error::Rusqlite)?;
            Ok(())
        })
        .await
        .map_err(|err| RagError::Storage(err.to_string()))?;
        Ok(Self { conn })
    }

    fn register_sqlite_vec() -> Result<(), RagError> {
        use std::sync::Mutex;

        static INIT: Once = Once::new();
        static INIT_RESULT: Mutex<Option<Result<(), String>>> = Mutex::new(None);

        INIT.call_once(|| {
            let result = unsafe {
                type SqliteExtensionInit = unsafe extern "C" fn(
                    *mut ffi::sqlite3,
                    *mut *const c_char,
                    *const ffi::sqlite3_api_routines,
                ) -> i32;

                let init: unsafe extern "C" fn() = sqlite_vec::sqlite3_vec_init;
                let init_fn: SqliteExtensionInit =
                    transmute::<unsafe extern "C" fn(), SqliteExtensionInit>(init);
                let rc = ffi::sqlite3_auto_extension(Some(init_fn));
                if rc != 0 {
                    Err(format!(
                        "failed to register sqlite-vec extension (code {rc})"
                    ))
                } else {
                    Ok(())
                }
            };
            *INIT_RESULT.lock().expect("init result mutex poisoned") = Some(result);
        });

        INIT_RESULT
            .lock()
            .expect("init result mutex poisoned")
            .clone()
            .expect("init was called but result not set")
            .map_err(RagError::Storage)
    }

    /// Remove every row the ingestion pipeline owns. Never called
    /// implicitly; a fresh corpus load is an explicit decision.
    pub async fn clear(&self) -> Result<(), RagError> {
        self.conn
            .call(|conn| {
                let tx = conn
                    .transaction()
                    .map_err(tokio_rusqlite::Error::Rusqlite)?;
                for table in [
                    "form_chunk_embeddings",
                    "form_chunks",
                    "form_documents",
                    "form_filings",
                    "form_embeddings",
                    "forms",
                    "legislation_chunk_embeddings",
                    "legislation_chunks",
                    "legislation_embeddings",
                    "legislation",
                ] {
                    tx.execute(&format!("DELETE FROM {table}"), [])
                        .map_err(tokio_rusqlite::Error::Rusqlite)?;
                }
                tx.commit().map_err(tokio_rusqlite::Error::Rusqlite)?;
                Ok(())
            })
            .await
            .map_err(|err| RagError::Storage(err.to_string()))
    }

    pub async fn form_exists(&self, form_id: &str) -> Result<bool, RagError> {
        self.exists(
            "SELECT COUNT(*) FROM forms WHERE form_id = ?1",
            vec![form_id.to_string()],
        )
        .await
    }

    pub async fn form_document_exists(
        &self,
        form_id: &str,
        file_name: &str,
    ) -> Result<bool, RagError> {
        self.exists(
            "SELECT COUNT(*) FROM form_documents WHERE form_id = ?1 AND file_name = ?2",
            vec![form_id.to_string(), file_name.to_string()],
        )
        .await
    }

    pub async fn form_chunk_exists(&self, form_id: &str, content: &str) -> Result<bool, RagError> {
        self.exists(
            "SELECT COUNT(*) FROM form_chunks WHERE form_id = ?1 AND content = ?2",
            vec![form_id.to_string(), content.to_string()],
        )
        .await
    }

    pub async fn legislation_exists(&self, act: &str, code: &str) -> Result<bool, RagError> {
        self.exists(
            "SELECT COUNT(*) FROM legislation WHERE act = ?1 AND code = ?2",
            vec![act.to_string(), code.to_string()],
        )
        .await
    }

    pub async fn legislation_chunk_exists(
        &self,
        act: &str,
        code: &str,
        content: &str,
    ) -> Result<bool, RagError> {
        self.exists(
            "SELECT COUNT(*) FROM legislation_chunks WHERE act = ?1 AND code = ?2 AND content = ?3",
            vec![act.to_string(), code.to_string(), content.to_string()],
        )
        .await
    }

    async fn exists(&self, sql: &'static str, params: Vec<String>) -> Result<bool, RagError> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(sql).map_err(tokio_rusqlite::Error::Rusqlite)?;
                for (i, param) in params.iter().enumerate() {
                    stmt.raw_bind_parameter(i + 1, param)
                        .map_err(tokio_rusqlite::Error::Rusqlite)?;
                }
                let mut rows = stmt.raw_query();
                let count: i64 = match rows.next().map_err(tokio_rusqlite::Error::Rusqlite)? {
                    Some(row) => row.get(0).map_err(tokio_rusqlite::Error::Rusqlite)?,
                    None => 0,
                };
                Ok(count > 0)
            })
            .await
            .map_err(|err| RagError::Storage(err.to_string()))
    }

    /// Insert a form parent row and its description embedding atomically.
    pub async fn insert_form(&self, row: FormRow, embedding: Vec<f32>) -> Result<(), RagError> {
        let embedding_json = serde_json::to_string(&embedding)?;
        self.conn
            .call(move |conn| {
                let tx = conn
                    .transaction()
                    .map_err(tokio_rusqlite::Error::Rusqlite)?;
                let inserted = tx
                    .execute(
                        "INSERT OR IGNORE INTO forms (form_id, title, link, description) \
                         VALUES (?1, ?2, ?3, ?4)",
                        (&row.form_id, &row.title, &row.link, &row.description),
                    )
                    .map_err(tokio_rusqlite::Error::Rusqlite)?;
                if inserted > 0 {
                    tx.execute(
                        "INSERT INTO form_embeddings (form_id, embedding) \
                         VALUES (?1, vec_f32(?2))",
                        (&row.form_id, &embedding_json),
                    )
                    .map_err(tokio_rusqlite::Error::Rusqlite)?;
                }
                tx.commit().map_err(tokio_rusqlite::Error::Rusqlite)?;
                Ok(())
            })
            .await
            .map_err(|err| RagError::Storage(err.to_string()))
    }

    /// Insert one document row plus its embedded chunks in one transaction.
    ///
    /// Chunks already on record for the form (same content) are ignored, so
    /// re-running ingestion is a no-op per document.
    pub async fn insert_form_document(
        &self,
        document: FormDocumentRow,
        source: ChunkSource,
        chunks: Vec<(String, Vec<f32>)>,
    ) -> Result<usize, RagError> {
        let mut encoded = Vec::with_capacity(chunks.len());
        for (content, embedding) in chunks {
            encoded.push((content, serde_json::to_string(&embedding)?));
        }
        let source = source.as_str();
        self.conn
            .call(move |conn| {
                let tx = conn
                    .transaction()
                    .map_err(tokio_rusqlite::Error::Rusqlite)?;
                tx.execute(
                    "INSERT OR IGNORE INTO form_documents (form_id, file_name, url, title) \
                     VALUES (?1, ?2, ?3, ?4)",
                    (
                        &document.form_id,
                        &document.file_name,
                        &document.url,
                        &document.title,
                    ),
                )
                .map_err(tokio_rusqlite::Error::Rusqlite)?;

                let mut written = 0usize;
                for (content, embedding_json) in &encoded {
                    let inserted = tx
                        .execute(
                            "INSERT OR IGNORE INTO form_chunks \
                             (form_id, file_name, source, content) VALUES (?1, ?2, ?3, ?4)",
                            (&document.form_id, &document.file_name, source, content),
                        )
                        .map_err(tokio_rusqlite::Error::Rusqlite)?;
                    if inserted > 0 {
                        let chunk_id = tx.last_insert_rowid();
                        tx.execute(
                            "INSERT INTO form_chunk_embeddings (chunk_id, embedding) \
                             VALUES (?1, vec_f32(?2))",
                            (chunk_id, embedding_json),
                        )
                        .map_err(tokio_rusqlite::Error::Rusqlite)?;
                        written += 1;
                    }
                }
                tx.commit().map_err(tokio_rusqlite::Error::Rusqlite)?;
                Ok(written)
            })
            .await
            .map_err(|err| RagError::Storage(err.to_string()))
    }

    /// Insert fee lines for one filing topic in one transaction.
    pub async fn insert_filings(
        &self,
        form_id: &str,
        topic_id: &str,
        filings: Vec<FilingRow>,
    ) -> Result<(), RagError> {
        let form_id = form_id.to_string();
        let topic_id = topic_id.to_string();
        self.conn
            .call(move |conn| {
                let tx = conn
                    .transaction()
                    .map_err(tokio_rusqlite::Error::Rusqlite)?;
                for filing in &filings {
                    tx.execute(
                        "INSERT OR IGNORE INTO form_filings \
                         (form_id, topic_id, category, paper_fee, online_fee) \
                         VALUES (?1, ?2, ?3, ?4, ?5)",
                        (
                            &form_id,
                            &topic_id,
                            &filing.category,
                            &filing.paper_fee,
                            &filing.online_fee,
                        ),
                    )
                    .map_err(tokio_rusqlite::Error::Rusqlite)?;
                }
                tx.commit().map_err(tokio_rusqlite::Error::Rusqlite)?;
                Ok(())
            })
            .await
            .map_err(|err| RagError::Storage(err.to_string()))
    }

    /// Insert a legislation parent row and its description embedding.
    pub async fn insert_legislation(
        &self,
        row: LegislationRow,
        embedding: Vec<f32>,
    ) -> Result<(), RagError> {
        let embedding_json = serde_json::to_string(&embedding)?;
        self.conn
            .call(move |conn| {
                let tx = conn
                    .transaction()
                    .map_err(tokio_rusqlite::Error::Rusqlite)?;
                let inserted = tx
                    .execute(
                        "INSERT OR IGNORE INTO legislation (act, code, link, description) \
                         VALUES (?1, ?2, ?3, ?4)",
                        (&row.act, &row.code, &row.link, &row.description),
                    )
                    .map_err(tokio_rusqlite::Error::Rusqlite)?;
                if inserted > 0 {
                    tx.execute(
                        "INSERT INTO legislation_embeddings (act, code, embedding) \
                         VALUES (?1, ?2, vec_f32(?3))",
                        (&row.act, &row.code, &embedding_json),
                    )
                    .map_err(tokio_rusqlite::Error::Rusqlite)?;
                }
                tx.commit().map_err(tokio_rusqlite::Error::Rusqlite)?;
                Ok(())
            })
            .await
            .map_err(|err| RagError::Storage(err.to_string()))
    }

    /// Insert embedded statute chunks for one document in one transaction.
    pub async fn insert_legislation_chunks(
        &self,
        act: &str,
        code: &str,
        chunks: Vec<(String, Vec<f32>)>,
    ) -> Result<usize, RagError> {
        let mut encoded = Vec::with_capacity(chunks.len());
        for (content, embedding) in chunks {
            encoded.push((content, serde_json::to_string(&embedding)?));
        }
        let act = act.to_string();
        let code = code.to_string();
        self.conn
            .call(move |conn| {
                let tx = conn
                    .transaction()
                    .map_err(tokio_rusqlite::Error::Rusqlite)?;
                let mut written = 0usize;
                for (content, embedding_json) in &encoded {
                    let inserted = tx
                        .execute(
                            "INSERT OR IGNORE INTO legislation_chunks (act, code, content) \
                             VALUES (?1, ?2, ?3)",
                            (&act, &code, content),
                        )
                        .map_err(tokio_rusqlite::Error::Rusqlite)?;
                    if inserted > 0 {
                        let chunk_id = tx.last_insert_rowid();
                        tx.execute(
                            "INSERT INTO legislation_chunk_embeddings (chunk_id, embedding) \
                             VALUES (?1, vec_f32(?2))",
                            (chunk_id, embedding_json),
                        )
                        .map_err(tokio_rusqlite::Error::Rusqlite)?;
                        written += 1;
                    }
                }
                tx.commit().map_err(tokio_rusqlite::Error::Rusqlite)?;
                Ok(written)
            })
            .await
            .map_err(|err| RagError::Storage(err.to_string()))
    }

    /// Rank form content by cosine distance and group hits by parent form.
    ///
    /// Both description embeddings and chunk embeddings participate in the
    /// ranking; a form's score is its best (lowest) distance. The first
    /// filing on record, if any, rides along as fee metadata.
    pub async fn search_forms(
        &self,
        query_embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult>, RagError> {
        let embedding_json = serde_json::to_string(query_embedding)?;
        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(
                        "SELECT f.form_id, f.title, f.link, f.description, NULL, \
                                vec_distance_cosine(fe.embedding, vec_f32(?1)) AS distance \
                         FROM forms f \
                         JOIN form_embeddings fe ON fe.form_id = f.form_id \
                         UNION ALL \
                         SELECT c.form_id, f.title, f.link, f.description, c.content, \
                                vec_distance_cosine(e.embedding, vec_f32(?1)) AS distance \
                         FROM form_chunks c \
                         JOIN form_chunk_embeddings e ON e.chunk_id = c.id \
                         JOIN forms f ON f.form_id = c.form_id \
                         WHERE c.source != 'instructions' \
                         ORDER BY distance ASC \
                         LIMIT ?2",
                    )
                    .map_err(tokio_rusqlite::Error::Rusqlite)?;

                let rows = stmt
                    .query_map((&embedding_json, top_k as i64), |row| {
                        Ok((
                            row.get::<_, String>(0)?,
                            row.get::<_, String>(1)?,
                            row.get::<_, String>(2)?,
                            row.get::<_, String>(3)?,
                            row.get::<_, Option<String>>(4)?,
                            row.get::<_, f32>(5)?,
                        ))
                    })
                    .map_err(tokio_rusqlite::Error::Rusqlite)?;

                let mut order: Vec<String> = Vec::new();
                let mut grouped: FxHashMap<String, SearchResult> = FxHashMap::default();
                for row in rows {
                    let (form_id, title, link, description, content, distance) =
                        row.map_err(tokio_rusqlite::Error::Rusqlite)?;
                    let entry = grouped.entry(form_id.clone()).or_insert_with(|| {
                        order.push(form_id.clone());
                        SearchResult {
                            kind: ContentKind::Forms,
                            id: form_id.clone(),
                            title,
                            description,
                            url: link,
                            score: distance,
                            snippets: Vec::new(),
                            details: SourceDetails::Form(FormDetails::default()),
                        }
                    });
                    if let Some(content) = content {
                        entry.snippets.push(content);
                    }
                }

                let mut filing_stmt = conn
                    .prepare(
                        "SELECT topic_id, category, paper_fee, online_fee \
                         FROM form_filings WHERE form_id = ?1 LIMIT 1",
                    )
                    .map_err(tokio_rusqlite::Error::Rusqlite)?;
                let mut results = Vec::with_capacity(order.len());
                for form_id in order {
                    let mut result = grouped
                        .remove(&form_id)
                        .ok_or_else(|| tokio_rusqlite::Error::Other("missing group".into()))?;
                    let filing = filing_stmt
                        .query_row((&form_id,), |row| {
                            Ok(FormDetails {
                                topic_id: row.get(0)?,
                                fee_category: row.get(1)?,
                                paper_fee: row.get(2)?,
                                online_fee: row.get(3)?,
                            })
                        })
                        .optional()
                        .map_err(tokio_rusqlite::Error::Rusqlite)?;
                    if let Some(details) = filing {
                        result.details = SourceDetails::Form(details);
                    }
                    results.push(result);
                }
                Ok(results)
            })
            .await
            .map_err(|err| RagError::Storage(err.to_string()))
    }

    /// Rank legislation descriptions and statute chunks, grouped by citation.
    pub async fn search_legislation(
        &self,
        query_embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult>, RagError> {
        let embedding_json = serde_json::to_string(query_embedding)?;
        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(
                        "SELECT l.act, l.code, l.link, l.description, NULL, \
                                vec_distance_cosine(le.embedding, vec_f32(?1)) AS distance \
                         FROM legislation l \
                         JOIN legislation_embeddings le ON le.act = l.act AND le.code = l.code \
                         UNION ALL \
                         SELECT c.act, c.code, l.link, l.description, c.content, \
                                vec_distance_cosine(e.embedding, vec_f32(?1)) AS distance \
                         FROM legislation_chunks c \
                         JOIN legislation_chunk_embeddings e ON e.chunk_id = c.id \
                         JOIN legislation l ON l.act = c.act AND l.code = c.code \
                         ORDER BY distance ASC \
                         LIMIT ?2",
                    )
                    .map_err(tokio_rusqlite::Error::Rusqlite)?;

                let rows = stmt
                    .query_map((&embedding_json, top_k as i64), |row| {
                        Ok((
                            row.get::<_, String>(0)?,
                            row.get::<_, String>(1)?,
                            row.get::<_, String>(2)?,
                            row.get::<_, String>(3)?,
                            row.get::<_, Option<String>>(4)?,
                            row.get::<_, f32>(5)?,
                        ))
                    })
                    .map_err(tokio_rusqlite::Error::Rusqlite)?;

                let mut order: Vec<String> = Vec::new();
                let mut grouped: FxHashMap<String, SearchResult> = FxHashMap::default();
                for row in rows {
                    let (act, code, link, description, content, distance) =
                        row.map_err(tokio_rusqlite::Error::Rusqlite)?;
                    let id = format!("{act} {code}");
                    let entry = grouped.entry(id.clone()).or_insert_with(|| {
                        order.push(id.clone());
                        SearchResult {
                            kind: ContentKind::Legislation,
                            id: id.clone(),
                            title: format!("{act} {code}"),
                            description,
                            url: link,
                            score: distance,
                            snippets: Vec::new(),
                            details: SourceDetails::Legislation(LegislationDetails {
                                act: act.clone(),
                                code: code.clone(),
                            }),
                        }
                    });
                    if let Some(content) = content {
                        entry.snippets.push(content);
                    }
                }

                let mut results = Vec::with_capacity(order.len());
                for id in order {
                    results.push(
                        grouped
                            .remove(&id)
                            .ok_or_else(|| tokio_rusqlite::Error::Other("missing group".into()))?,
                    );
                }
                Ok(results)
            })
            .await
            .map_err(|err| RagError::Storage(err.to_string()))
    }

    pub async fn counts(&self) -> Result<StoreCounts, RagError> {
        self.conn
            .call(|conn| {
                let count = |table: &str| -> Result<usize, tokio_rusqlite::Error> {
                    conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                        row.get::<_, i64>(0)
                    })
                    .map(|n| n as usize)
                    .map_err(tokio_rusqlite::Error::Rusqlite)
                };
                Ok(StoreCounts {
                    forms: count("forms")?,
                    form_documents: count("form_documents")?,
                    form_chunks: count("form_chunks")?,
                    form_filings: count("form_filings")?,
                    legislation: count("legislation")?,
                    legislation_chunks: count("legislation_chunks")?,
                })
            })
            .await
            .map_err(|err| RagError::Storage(err.to_string()))
    }
}
