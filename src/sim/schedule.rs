//! Cancellable delayed tasks
//!
//! Time-based match transitions (ready countdown, death delay) are queued here
//! instead of chained callbacks. Every task gets a unique token; a cancelled
//! or fired task is removed from the queue and can never fire again.

/// Handle to a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskToken(u64);

#[derive(Debug, Clone)]
struct ScheduledTask<T> {
    token: TaskToken,
    due: u64,
    task: T,
}

/// Tick-driven task queue
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    now: u64,
    next_token: u64,
    tasks: Vec<ScheduledTask<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now: 0,
            next_token: 1,
            tasks: Vec::new(),
        }
    }

    /// Current clock value in ticks
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Queue `task` to fire once the clock has advanced `delay` ticks
    pub fn schedule(&mut self, delay: u64, task: T) -> TaskToken {
        let token = TaskToken(self.next_token);
        self.next_token += 1;
        self.tasks.push(ScheduledTask {
            token,
            due: self.now + delay,
            task,
        });
        token
    }

    /// Returns false if the task already fired or was cancelled
    pub fn cancel(&mut self, token: TaskToken) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.token != token);
        self.tasks.len() != before
    }

    /// Drop every pending task; returns how many were cancelled
    pub fn cancel_all(&mut self) -> usize {
        let count = self.tasks.len();
        self.tasks.clear();
        count
    }

    pub fn is_pending(&self, token: TaskToken) -> bool {
        self.tasks.iter().any(|t| t.token == token)
    }

    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Advance the clock and remove every task now due, in due order
    /// (ties in scheduling order)
    pub fn advance(&mut self, ticks: u64) -> Vec<(TaskToken, T)> {
        self.now += ticks;
        let now = self.now;

        let mut due = Vec::new();
        let mut i = 0;
        while i < self.tasks.len() {
            if self.tasks[i].due <= now {
                due.push(self.tasks.remove(i));
            } else {
                i += 1;
            }
        }
        due.sort_by_key(|t| (t.due, t.token));
        due.into_iter().map(|t| (t.token, t.task)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_when_due() {
        let mut scheduler = Scheduler::new();
        let token = scheduler.schedule(3, "ready");
        assert!(scheduler.advance(2).is_empty());
        assert!(scheduler.is_pending(token));
        assert_eq!(scheduler.advance(1), vec![(token, "ready")]);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_fires_in_due_order() {
        let mut scheduler = Scheduler::new();
        let late = scheduler.schedule(5, "late");
        let early = scheduler.schedule(2, "early");
        let tie = scheduler.schedule(2, "tie");
        assert_eq!(
            scheduler.advance(10),
            vec![(early, "early"), (tie, "tie"), (late, "late")]
        );
    }

    #[test]
    fn test_cancelled_task_never_fires() {
        let mut scheduler = Scheduler::new();
        let token = scheduler.schedule(2, "dying");
        assert!(scheduler.cancel(token));
        assert!(!scheduler.cancel(token));
        assert!(scheduler.advance(100).is_empty());
    }

    #[test]
    fn test_fired_task_cannot_fire_twice() {
        let mut scheduler = Scheduler::new();
        let token = scheduler.schedule(1, 7u32);
        assert_eq!(scheduler.advance(1).len(), 1);
        assert!(scheduler.advance(1).is_empty());
        assert!(!scheduler.cancel(token));
    }

    #[test]
    fn test_cancel_all_supersedes_pending() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(1, "a");
        scheduler.schedule(4, "b");
        assert_eq!(scheduler.cancel_all(), 2);
        let fresh = scheduler.schedule(1, "c");
        assert_eq!(scheduler.advance(10), vec![(fresh, "c")]);
    }

    #[test]
    fn test_tokens_are_unique() {
        let mut scheduler = Scheduler::new();
        let a = scheduler.schedule(0, ());
        scheduler.cancel_all();
        let b = scheduler.schedule(0, ());
        assert_ne!(a, b);
    }
}
