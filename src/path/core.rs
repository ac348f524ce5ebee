use std::collections::{HashMap, HashSet, VecDeque};

use crate::graph::{MapStore, RoomId};

/// Shortest exit-label sequence from `source` to `destination`, counting
/// every exit as one step regardless of its visual length.
///
/// Exits are expanded in lexicographic label order and the first sequence
/// recorded for a room is never replaced, so ties resolve deterministically.
/// `None` means the destination is unreachable, which is a normal outcome.
/// `find_path(a, a)` returns an empty sequence; callers that want to report
/// "already there" check for that before searching.
pub fn find_path(store: &MapStore, source: &RoomId, destination: &RoomId) -> Option<Vec<String>> {
    let mut visited: HashSet<&RoomId> = HashSet::new();
    let mut paths: HashMap<&RoomId, Vec<&str>> = HashMap::new();
    let mut queue: VecDeque<&RoomId> = VecDeque::new();
    paths.insert(source, Vec::new());
    queue.push_back(source);

    while let Some(room) = queue.pop_front() {
        if !visited.insert(room) {
            continue;
        }
        if room == destination {
            return paths
                .remove(room)
                .map(|labels| labels.into_iter().map(str::to_string).collect());
        }
        for (label, exit) in store.room_exits(room) {
            if paths.contains_key(&exit.tgt) {
                continue;
            }
            let mut next = paths.get(room).cloned().unwrap_or_default();
            next.push(label.as_str());
            paths.insert(&exit.tgt, next);
            queue.push_back(&exit.tgt);
        }
    }
    None
}
