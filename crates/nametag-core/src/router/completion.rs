// Tab completion for `/tag`. Callers gate this on the admin node.

use crate::backend::PlayerDirectory;
use crate::orchestrator::TagOrchestrator;

fn starts_with_ignore_case(candidate: &str, prefix: &str) -> bool {
    candidate.to_lowercase().starts_with(&prefix.to_lowercase())
}

fn matching_ids(tags: &TagOrchestrator, prefix: &str) -> Vec<String> {
    tags.all_tags()
        .into_iter()
        .map(|t| t.id().to_owned())
        .filter(|id| starts_with_ignore_case(id, prefix))
        .collect()
}

/// Candidates for the last token of `args`.
pub fn complete(tags: &TagOrchestrator, players: &dyn PlayerDirectory, args: &[String]) -> Vec<String> {
    match args {
        [first] => ["create", "remove"]
            .into_iter()
            .map(str::to_owned)
            .chain(players.online_players().into_iter().map(|p| p.name().to_owned()))
            .filter(|c| starts_with_ignore_case(c, first))
            .collect(),
        [first, second] => {
            if first.eq_ignore_ascii_case("create") {
                Vec::new()
            } else if first.eq_ignore_ascii_case("remove") {
                matching_ids(tags, second)
            } else {
                ["add", "remove"]
                    .into_iter()
                    .filter(|a| starts_with_ignore_case(a, second))
                    .map(str::to_owned)
                    .collect()
            }
        }
        [first, action, third] => {
            let is_op = action.eq_ignore_ascii_case("add") || action.eq_ignore_ascii_case("remove");
            if is_op && !first.eq_ignore_ascii_case("create") {
                matching_ids(tags, third)
            } else {
                Vec::new()
            }
        }
        _ => Vec::new(),
    }
}
