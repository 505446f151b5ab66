//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `bloom_core` linkage.
//! - Exercise one offline add/load round-trip against in-memory backends.

use bloom_core::{
    JournalEntry, JournalEntryDraft, JournalService, JournalServiceError, MemoryRemote,
    MemoryStore,
};

fn offline_roundtrip(
    journal: &mut JournalService,
) -> Result<(JournalEntry, usize), JournalServiceError> {
    let draft = JournalEntryDraft {
        title: "Smoke check".to_string(),
        body: "offline round-trip".to_string(),
        mood: 4,
        tags: Vec::new(),
    };
    let entry = journal.add_entry("smoke", draft)?;
    let loaded = journal.entries("smoke")?;
    Ok((entry, loaded.len()))
}

fn main() {
    println!("bloom_core ping={}", bloom_core::ping());
    println!("bloom_core version={}", bloom_core::core_version());

    let mut journal = JournalService::new(
        Box::new(MemoryStore::new()),
        Box::new(MemoryRemote::<JournalEntry>::offline()),
    );
    match offline_roundtrip(&mut journal) {
        Ok((entry, count)) => println!("offline round-trip id={} entries={count}", entry.id),
        Err(err) => {
            eprintln!("offline round-trip failed: {err}");
            std::process::exit(1);
        }
    }
}
