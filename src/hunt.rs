//! Follow-up shots queued around confirmed hits.

use alloc::collections::VecDeque;

/// A scheduled follow-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HuntTask {
    FireAt { row: usize, col: usize },
}

impl HuntTask {
    pub fn target(&self) -> (usize, usize) {
        match *self {
            HuntTask::FireAt { row, col } => (row, col),
        }
    }
}

/// Where a new task goes in the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskPriority {
    /// Runs next.
    High,
    /// Runs after everything already queued.
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HuntState {
    Idle,
    Hunting,
}

/// Last-in-first-out task queue: high priority tasks push to the front, so a
/// hunt follows the most recent hit first.
#[derive(Debug, Clone, Default)]
pub struct HuntScheduler {
    tasks: VecDeque<HuntTask>,
}

impl HuntScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> HuntState {
        if self.tasks.is_empty() {
            HuntState::Idle
        } else {
            HuntState::Hunting
        }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn push(&mut self, task: HuntTask, priority: TaskPriority) {
        match priority {
            TaskPriority::High => self.tasks.push_front(task),
            TaskPriority::Low => self.tasks.push_back(task),
        }
    }

    pub fn pop(&mut self) -> Option<HuntTask> {
        self.tasks.pop_front()
    }

    /// Pops until a task whose target is still `open`; stale ones are dropped.
    pub fn next_valid<F>(&mut self, mut open: F) -> Option<HuntTask>
    where
        F: FnMut(usize, usize) -> bool,
    {
        while let Some(task) = self.tasks.pop_front() {
            let (row, col) = task.target();
            if open(row, col) {
                return Some(task);
            }
            log::debug!("dropping stale hunt task at ({}, {})", row, col);
        }
        None
    }

    /// Queues a high priority shot at each orthogonal neighbor of (row, col)
    /// inside a `rows × cols` grid that passes `plausible`. Neighbors are
    /// pushed down, up, right, left, so the left one runs first.
    pub fn schedule_neighbors<F>(
        &mut self,
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
        mut plausible: F,
    ) -> usize
    where
        F: FnMut(usize, usize) -> bool,
    {
        let candidates = [
            (row.checked_add(1), Some(col)),
            (row.checked_sub(1), Some(col)),
            (Some(row), col.checked_add(1)),
            (Some(row), col.checked_sub(1)),
        ];
        let mut pushed = 0;
        for (r, c) in candidates {
            let (Some(r), Some(c)) = (r, c) else { continue };
            if r < rows && c < cols && plausible(r, c) {
                self.push(HuntTask::FireAt { row: r, col: c }, TaskPriority::High);
                pushed += 1;
            }
        }
        pushed
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        self.tasks.iter().any(|t| t.target() == (row, col))
    }

    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&HuntTask) -> bool,
    {
        self.tasks.retain(|t| keep(t));
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &HuntTask> {
        self.tasks.iter()
    }
}
