//! Partition enumeration
//!
//! Generates every way to split a universe of n labeled elements into
//! unordered, disjoint teams of size k, each distinct partition exactly
//! once, as a lazy single-pass iterator.
//!
//! The construction is an anchor-elimination recursion realized as an
//! explicit depth-first stack: at each level one anchor element is fixed,
//! every (k-1)-combination of the remaining pool completes the anchor's
//! team, and the recursion continues on the shrunken pool. Because the
//! anchor is part of exactly one team per branch and combinations are drawn
//! from a strictly shrinking pool, no two emitted partitions can be
//! permutations of each other. Each stack frame owns an immutable copy of
//! its pool; nothing is shared across branches.
//!
//! Total cardinality is n! / ((k!)^(n/k) * (n/k)!), available in closed
//! form through [`partition_count`].

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use dilemma_common::{DilemmaError, PartitionError, Result};

/// How the anchor element is picked at each recursion level
///
/// Any policy enumerates the identical partition set; the choice only
/// affects emission order. The deterministic default keeps test fixtures
/// reproducible, the seeded variant reproduces randomized pivoting without
/// giving up reproducibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnchorPolicy {
    /// Always pick the first remaining element
    #[default]
    First,
    /// Pick a pseudo-random remaining element from a seeded stream
    Seeded(u64),
}

/// A k-sized team, members kept sorted by name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    members: Vec<String>,
}

impl Team {
    /// Build a team, sorting members and rejecting duplicates
    pub fn new(mut members: Vec<String>) -> Result<Self> {
        members.sort();
        for pair in members.windows(2) {
            if pair[0] == pair[1] {
                return Err(PartitionError::DuplicateElement(pair[0].clone()).into());
            }
        }
        Ok(Self { members })
    }

    /// Internal constructor for the generator, which guarantees distinctness
    pub(crate) fn from_names(mut members: Vec<String>) -> Self {
        members.sort();
        Self { members }
    }

    /// Member names, sorted
    pub fn members(&self) -> &[String] {
        &self.members
    }

    pub fn size(&self) -> usize {
        self.members.len()
    }

    /// Members as a single comma-joined string
    pub fn joined(&self) -> String {
        self.members.join(",")
    }
}

/// One full decomposition of the universe into disjoint teams
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    teams: Vec<Team>,
}

impl Partition {
    pub fn new(teams: Vec<Team>) -> Self {
        Self { teams }
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn team_count(&self) -> usize {
        self.teams.len()
    }
}

/// Lexicographic r-combinations of 0..m, by index
#[derive(Debug)]
struct Combinations {
    m: usize,
    r: usize,
    idx: Vec<usize>,
    started: bool,
    done: bool,
}

impl Combinations {
    fn new(m: usize, r: usize) -> Self {
        Self {
            m,
            r,
            idx: (0..r).collect(),
            started: false,
            done: r > m,
        }
    }

    fn next(&mut self) -> Option<Vec<usize>> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
            return Some(self.idx.clone());
        }
        // rightmost position that can still move up
        let mut i = self.r as isize - 1;
        while i >= 0 && self.idx[i as usize] == self.m - self.r + i as usize {
            i -= 1;
        }
        if i < 0 {
            self.done = true;
            return None;
        }
        let i = i as usize;
        self.idx[i] += 1;
        for j in (i + 1)..self.r {
            self.idx[j] = self.idx[j - 1] + 1;
        }
        Some(self.idx.clone())
    }
}

/// One level of the anchor-elimination recursion
#[derive(Debug)]
struct Frame {
    pool: Vec<u32>,
    anchor: u32,
    rest: Vec<u32>,
    combs: Combinations,
    team: Vec<u32>,
}

impl Frame {
    fn new(pool: Vec<u32>, k: usize, rng: &mut Option<StdRng>) -> Self {
        let pos = match rng {
            Some(r) => r.gen_range(0..pool.len()),
            None => 0,
        };
        let anchor = pool[pos];
        let rest: Vec<u32> = pool.iter().copied().filter(|&e| e != anchor).collect();
        let combs = Combinations::new(rest.len(), k - 1);
        Self {
            pool,
            anchor,
            rest,
            combs,
            team: Vec::new(),
        }
    }
}

/// Lazy, duplicate-free enumeration of all k-partitions of a universe
///
/// Single-pass and non-restartable: build a fresh generator to re-enumerate.
#[derive(Debug)]
pub struct Partitions {
    names: Vec<String>,
    k: usize,
    stack: Vec<Frame>,
    rng: Option<StdRng>,
    empty_pending: bool,
}

impl Partitions {
    /// Start an enumeration over the given element names
    ///
    /// Rejects k = 0 and any universe whose size is not a multiple of k
    /// before any work happens; silently under-enumerating is not an
    /// option.
    pub fn new(names: Vec<String>, k: usize, anchor: AnchorPolicy) -> Result<Self> {
        if k == 0 {
            return Err(PartitionError::ZeroTeamSize.into());
        }
        if names.len() % k != 0 {
            return Err(PartitionError::UnevenTeams {
                universe: names.len(),
                team_size: k,
            }
            .into());
        }

        let mut rng = match anchor {
            AnchorPolicy::First => None,
            AnchorPolicy::Seeded(seed) => Some(StdRng::seed_from_u64(seed)),
        };

        let empty_pending = names.is_empty();
        let mut stack = Vec::with_capacity(names.len() / k);
        if !names.is_empty() {
            let pool: Vec<u32> = (0..names.len() as u32).collect();
            stack.push(Frame::new(pool, k, &mut rng));
        }

        Ok(Self {
            names,
            k,
            stack,
            rng,
            empty_pending,
        })
    }

    fn materialize(&self) -> Partition {
        let teams = self
            .stack
            .iter()
            .map(|frame| {
                Team::from_names(
                    frame
                        .team
                        .iter()
                        .map(|&i| self.names[i as usize].clone())
                        .collect(),
                )
            })
            .collect();
        Partition::new(teams)
    }
}

impl Iterator for Partitions {
    type Item = Partition;

    fn next(&mut self) -> Option<Partition> {
        if self.empty_pending {
            // exactly one way to partition nothing
            self.empty_pending = false;
            return Some(Partition::new(Vec::new()));
        }

        loop {
            let next_pool = {
                let top = self.stack.last_mut()?;
                match top.combs.next() {
                    Some(comb) => {
                        let mut team: Vec<u32> =
                            comb.into_iter().map(|ci| top.rest[ci]).collect();
                        team.push(top.anchor);
                        team.sort_unstable();
                        let pool: Vec<u32> = top
                            .pool
                            .iter()
                            .copied()
                            .filter(|e| !team.contains(e))
                            .collect();
                        top.team = team;
                        Some(pool)
                    }
                    None => None,
                }
            };

            match next_pool {
                Some(pool) if pool.is_empty() => return Some(self.materialize()),
                Some(pool) => {
                    let frame = Frame::new(pool, self.k, &mut self.rng);
                    self.stack.push(frame);
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

/// Closed-form partition cardinality: n! / ((k!)^(n/k) * (n/k)!)
///
/// Computed as the product of C(remaining-1, k-1) over successive anchor
/// eliminations, which is the same recursion the generator walks.
pub fn partition_count(n: usize, k: usize) -> Result<u128> {
    if k == 0 {
        return Err(PartitionError::ZeroTeamSize.into());
    }
    if n % k != 0 {
        return Err(PartitionError::UnevenTeams {
            universe: n,
            team_size: k,
        }
        .into());
    }

    let overflow = || DilemmaError::Internal(format!("partition count overflow for n={n}, k={k}"));

    let mut count: u128 = 1;
    let mut remaining = n;
    while remaining > 0 {
        let ways = binomial((remaining - 1) as u128, (k - 1) as u128).ok_or_else(overflow)?;
        count = count.checked_mul(ways).ok_or_else(overflow)?;
        remaining -= k;
    }
    Ok(count)
}

fn binomial(n: u128, r: u128) -> Option<u128> {
    if r > n {
        return Some(0);
    }
    let r = r.min(n - r);
    let mut result: u128 = 1;
    for i in 1..=r {
        // numerator grows before each exact division
        result = result.checked_mul(n - r + i)? / i;
    }
    Some(result)
}
