use cookfind_core::Candidate;

/// One of the two result lists (exact or fuzzy) with its selection.
#[derive(Debug, Clone, Default)]
pub struct ResultList {
    pub items: Vec<Candidate>,
    pub cursor: usize,
}

impl ResultList {
    pub fn push(&mut self, candidate: Candidate) {
        self.items.push(candidate);
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.cursor = 0;
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn selected(&self) -> Option<&Candidate> {
        self.items.get(self.cursor)
    }

    pub fn move_down(&mut self) {
        if self.cursor + 1 < self.items.len() {
            self.cursor += 1;
        }
    }

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn go_top(&mut self) {
        self.cursor = 0;
    }

    pub fn go_bottom(&mut self) {
        self.cursor = self.items.len().saturating_sub(1);
    }
}
