//! Table-Aware Chunking of a Fee Schedule
//!
//! Chunks a small banking document and prints each chunk, then the JSON
//! the storage layer would persist for it.
//!
//! ```bash
//! RUST_LOG=tabslab=debug cargo run --example banking_tables
//! ```
//!
//! An optional first argument is a JSON config, e.g. `'{"chunkSize": 300}'`.

use tabslab::{ChunkConfig, Chunker, TableAwareChunker};
use tracing_subscriber::EnvFilter;

const DOCUMENT: &str = "Personal Checking Account Disclosure\n\n\
This disclosure describes the fees and rates that apply to your account. \
Please keep it with your records.\n\n\
Schedule A  Account fees\n\
Effective 1 March.\n\
| Service                     | Fee    |\n\
|-----------------------------|--------|\n\
| Monthly maintenance         | $12.00 |\n\
| Domestic wire transfer      | $25.00 |\n\
| International wire transfer | $45.00 |\n\
| Stop payment                | $30.00 |\n\n\
The monthly maintenance fee is waived when the average daily balance is \
at least $1,500.\n\n\
Table 2.1 Interest rates\n\
| Balance tier   | APY   |\n\
|----------------|-------|\n\
| $0 - $9,999    | 0.01% |\n\
| $10,000 and up | 0.05% |\n\n\
Rates are variable and may change after the account is opened.";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match std::env::args().nth(1) {
        Some(json) => serde_json::from_str::<ChunkConfig>(&json)?,
        None => ChunkConfig::default(),
    };
    let chunker = TableAwareChunker::new(config)?;
    let chunks = chunker.chunk(DOCUMENT);

    println!("Document: {} chars", DOCUMENT.chars().count());
    println!("Chunks: {}\n", chunks.len());

    for chunk in &chunks {
        println!("{chunk}");
        println!("{}\n", chunk.content);
    }

    // What the storage layer receives for each chunk.
    for chunk in &chunks {
        println!("{}", serde_json::to_string(&chunk.metadata)?);
    }

    Ok(())
}
