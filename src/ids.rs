use uuid::Uuid;

/// Generates a random v4 token not already `taken`.
pub fn fresh_id(taken: impl Fn(&str) -> bool) -> String {
    loop {
        let id = Uuid::new_v4().to_string();
        if !taken(&id) {
            return id;
        }
    }
}
