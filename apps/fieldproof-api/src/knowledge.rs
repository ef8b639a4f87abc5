//! Built-in knowledge clip corpus
//!
//! Expert-authored guidance notes, embedded at build time. Immutable
//! reference data; users never write to this collection.

use shared_types::KnowledgeClip;

fn clip(
    id: &str,
    title: &str,
    author: &str,
    content: &str,
    task_type: &str,
    trigger_keywords: &[&str],
) -> KnowledgeClip {
    KnowledgeClip {
        id: id.to_string(),
        title: title.to_string(),
        author: author.to_string(),
        content: content.to_string(),
        task_type: task_type.to_string(),
        trigger_keywords: trigger_keywords.iter().map(|s| s.to_string()).collect(),
    }
}

/// The curated corpus, in presentation order
pub fn builtin_clips() -> Vec<KnowledgeClip> {
    vec![
        clip(
            "gfci-wet-locations",
            "GFCI protection in wet locations",
            "Ray Delgado",
            "Any receptacle serving a countertop, sink zone, garage, or exterior \
             wall needs GFCI protection. Test the device after install with a plug \
             tester, not just the button: the button only proves the device trips, \
             not that line and load are landed correctly.",
            "electrical",
            &["gfci", "receptacle", "outlet", "kitchen", "bathroom"],
        ),
        clip(
            "panel-workmanship",
            "Panel workmanship that passes first time",
            "Ray Delgado",
            "Torque lugs to spec and mark them, keep conductor sweep gradual, land \
             one conductor per terminal unless the lug is rated for two, and fill \
             the panel directory before calling for inspection.",
            "electrical",
            &["panel", "breaker", "lug", "torque"],
        ),
        clip(
            "box-fill-counts",
            "Counting box fill correctly",
            "Marisol Vega",
            "Each conductor counts once, all grounds together count once, and each \
             device counts twice at the largest conductor size landing on it. \
             Undersized boxes are the most common rough-in rejection.",
            "electrical",
            &["box fill", "junction", "conductor"],
        ),
        clip(
            "deck-ledger-attachment",
            "Deck ledger attachment and flashing",
            "Curt Boman",
            "Ledgers need through-bolts or structural screws on a staggered \
             schedule, never nails alone, with flashing lapped over the ledger and \
             behind the housewrap. Water trapped at the ledger is what actually \
             brings decks down.",
            "carpentry",
            &["ledger", "deck", "flashing", "lag"],
        ),
        clip(
            "trap-arm-slope",
            "Trap arm length and slope",
            "Marisol Vega",
            "Keep the trap arm within the distance limit for the pipe size and hold \
             quarter-inch-per-foot slope. A steeper run siphons the trap; a longer \
             one loses venting.",
            "plumbing",
            &["trap", "drain", "slope", "vent"],
        ),
        clip(
            "water-heater-tpr",
            "Water heater T&P discharge piping",
            "Curt Boman",
            "The relief valve discharge must run full size to an approved location, \
             terminate within six inches of the floor, and never be trapped, \
             threaded at the outlet, or reduced.",
            "plumbing",
            &["water heater", "relief", "discharge", "tpr"],
        ),
    ]
}
