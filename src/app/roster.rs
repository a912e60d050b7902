//! The admin roster and its per-student course enrichment.
//!
//! The roster fetch and the per-student course fetches complete in any
//! order. Each request is stamped with a sequence number when it is issued
//! and a result only lands if it is at least as new as the last one applied
//! for that student, so the merged roster depends on issue order, not
//! arrival order.

use crate::model::structs::UserRegistration;
use std::collections::{HashMap, HashSet};

/// Hands out increasing sequence numbers, starting at 1. Held next to the
/// roster's `Resource`; issuing never touches roster data.
#[derive(Debug, Clone, Default)]
pub struct Sequence {
    last: u64,
}

impl Sequence {
    /// Sequence number for a request about to be sent.
    pub fn issue(&mut self) -> u64 {
        self.last += 1;
        self.last
    }
}

#[derive(Debug, Clone, Default)]
pub struct Roster {
    students: Vec<UserRegistration>,
    // last sequence applied to each listed student's `courses`
    applied: HashMap<String, u64>,
    // course results for students the roster doesn't list (yet)
    pending: HashMap<String, (u64, Vec<String>)>,
}

impl Roster {
    pub fn students(&self) -> &[UserRegistration] {
        &self.students
    }

    pub fn get(&self, username: &str) -> Option<&UserRegistration> {
        self.students.iter().find(|s| s.username == username)
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    /// Installs a freshly fetched roster issued at `seq`.
    ///
    /// Course lists already applied by newer requests survive the
    /// replacement; buffered course results are applied if newer still.
    /// Bookkeeping for students no longer listed is dropped, as are buffered
    /// results older than this roster.
    pub fn replace_students(&mut self, seq: u64, students: Vec<UserRegistration>) {
        let listed: HashSet<String> = students.iter().map(|s| s.username.clone()).collect();
        self.applied.retain(|username, _| listed.contains(username));

        let mut previous: HashMap<String, Option<Vec<String>>> = self
            .students
            .drain(..)
            .map(|s| (s.username, s.courses))
            .collect();

        for mut student in students {
            let applied = self.applied.get(&student.username).copied();
            match applied {
                Some(newer) if newer > seq => {
                    student.courses = previous.remove(&student.username).flatten();
                }
                _ => {
                    if student.courses.is_some() {
                        self.applied.insert(student.username.clone(), seq);
                    }
                }
            }

            if let Some((pending_seq, courses)) = self.pending.remove(&student.username) {
                let current = self.applied.get(&student.username).copied().unwrap_or(0);
                if pending_seq >= current {
                    student.courses = Some(courses);
                    self.applied.insert(student.username.clone(), pending_seq);
                }
            }

            self.students.push(student);
        }

        self.pending.retain(|_, (pending_seq, _)| *pending_seq > seq);
    }

    /// Merges one student's course list fetched by request `seq`.
    ///
    /// Returns `false` when the result is stale and was discarded.
    pub fn apply_courses(&mut self, username: &str, seq: u64, courses: Vec<String>) -> bool {
        let current = self.applied.get(username).copied().unwrap_or(0);
        if seq < current {
            log::debug!("Discarding stale courses for {username} (seq {seq} < {current})");
            return false;
        }

        match self.students.iter_mut().find(|s| s.username == username) {
            Some(student) => {
                student.courses = Some(courses);
                self.applied.insert(username.to_string(), seq);
                true
            }
            None => {
                let newer = self
                    .pending
                    .get(username)
                    .map_or(true, |(pending_seq, _)| seq >= *pending_seq);
                if newer {
                    self.pending.insert(username.to_string(), (seq, courses));
                }
                newer
            }
        }
    }
}
