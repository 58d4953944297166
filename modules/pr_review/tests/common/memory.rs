//! In-memory repository with optional failure injection.
//!
//! `begin` takes an owned lock on the whole store, so transactions run one at a
//! time. Writes land on a working copy that only replaces the store on commit;
//! dropping the transaction discards it.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex};

use anyhow::{anyhow, bail};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, OwnedMutexGuard};

use pr_review::contract::model::{
    PullRequest, PullRequestShort, PullRequestStatus, Team, TeamMember, User,
};
use pr_review::domain::repo::{ReviewRepository, ReviewTx};

#[derive(Debug, Clone, Default)]
pub struct State {
    pub teams: BTreeSet<String>,
    pub users: BTreeMap<String, User>,
    pub prs: BTreeMap<String, PullRequest>,
}

#[derive(Clone, Default)]
pub struct MemoryRepo {
    state: Arc<Mutex<State>>,
    fail_on: Arc<StdMutex<Option<&'static str>>>,
    merged_behind: Arc<AtomicBool>,
}

impl MemoryRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the named transaction operation fail from now on.
    pub fn fail_on(&self, op: &'static str) {
        *self.fail_on.lock().unwrap() = Some(op);
    }

    pub fn heal(&self) {
        *self.fail_on.lock().unwrap() = None;
    }

    /// Locked pull request reads return the row as it was, while the store
    /// already holds it merged, as if another writer got there first.
    pub fn merge_behind_locked_reads(&self) {
        self.merged_behind.store(true, Ordering::SeqCst);
    }

    pub async fn snapshot(&self) -> State {
        self.state.lock().await.clone()
    }

    /// Place users and teams directly, bypassing the service.
    pub async fn seed_user(&self, id: &str, team: Option<&str>, active: bool) {
        let mut s = self.state.lock().await;
        if let Some(t) = team {
            s.teams.insert(t.to_string());
        }
        s.users.insert(
            id.to_string(),
            User {
                id: id.to_string(),
                username: format!("user-{id}"),
                is_active: active,
                team_name: team.map(str::to_string),
            },
        );
    }
}

#[async_trait]
impl ReviewRepository for MemoryRepo {
    async fn begin(&self) -> anyhow::Result<Box<dyn ReviewTx>> {
        let fail_on = *self.fail_on.lock().unwrap();
        if fail_on == Some("begin") {
            bail!("injected failure in begin");
        }
        let guard = self.state.clone().lock_owned().await;
        let work = guard.clone();
        Ok(Box::new(MemoryTx {
            guard,
            work: StdMutex::new(work),
            fail_on,
            merged_behind: self.merged_behind.load(Ordering::SeqCst),
        }))
    }
}

pub struct MemoryTx {
    guard: OwnedMutexGuard<State>,
    work: StdMutex<State>,
    fail_on: Option<&'static str>,
    merged_behind: bool,
}

impl MemoryTx {
    fn check(&self, op: &'static str) -> anyhow::Result<()> {
        if self.fail_on == Some(op) {
            return Err(anyhow!("injected failure in {op}"));
        }
        Ok(())
    }

    fn with<T>(&self, op: &'static str, f: impl FnOnce(&mut State) -> T) -> anyhow::Result<T> {
        self.check(op)?;
        let mut s = self.work.lock().unwrap();
        Ok(f(&mut s))
    }

    fn insert_links(&self, pr_id: &str, user_ids: &[String]) -> anyhow::Result<()> {
        let mut s = self.work.lock().unwrap();
        let pr = s
            .prs
            .get_mut(pr_id)
            .ok_or_else(|| anyhow!("foreign key: pull request {pr_id}"))?;
        for uid in user_ids {
            if pr.has_reviewer(uid) {
                bail!("duplicate key: pr_reviewers ({pr_id}, {uid})");
            }
            pr.assigned_reviewers.push(uid.clone());
        }
        pr.assigned_reviewers.sort();
        Ok(())
    }
}

fn members_of(s: &State, team: &str) -> Vec<User> {
    s.users
        .values()
        .filter(|u| u.team_name.as_deref() == Some(team))
        .cloned()
        .collect()
}

#[async_trait]
impl ReviewTx for MemoryTx {
    async fn get_user(&self, id: &str) -> anyhow::Result<Option<User>> {
        self.with("get_user", |s| s.users.get(id).cloned())
    }

    async fn get_team(&self, name: &str) -> anyhow::Result<Option<Team>> {
        self.with("get_team", |s| {
            s.teams.contains(name).then(|| Team {
                name: name.to_string(),
                members: members_of(s, name).iter().map(TeamMember::from).collect(),
            })
        })
    }

    async fn get_team_members(&self, team_name: &str) -> anyhow::Result<Vec<User>> {
        self.with("get_team_members", |s| members_of(s, team_name))
    }

    async fn get_pull_request(&self, id: &str) -> anyhow::Result<Option<PullRequest>> {
        self.with("get_pull_request", |s| s.prs.get(id).cloned())
    }

    async fn get_pull_request_for_update(&self, id: &str) -> anyhow::Result<Option<PullRequest>> {
        let merged_behind = self.merged_behind;
        self.with("get_pull_request_for_update", |s| {
            let seen = s.prs.get(id).cloned();
            if merged_behind {
                if let Some(pr) = s.prs.get_mut(id) {
                    pr.status = PullRequestStatus::Merged;
                    pr.merged_at = Some(pr.created_at);
                }
            }
            seen
        })
    }

    async fn list_reviewer_assignments(
        &self,
        user_id: &str,
    ) -> anyhow::Result<Vec<PullRequestShort>> {
        self.with("list_reviewer_assignments", |s| {
            s.prs
                .values()
                .filter(|pr| pr.has_reviewer(user_id))
                .map(PullRequestShort::from)
                .collect()
        })
    }

    async fn save_team(&self, name: &str) -> anyhow::Result<()> {
        self.check("save_team")?;
        let mut s = self.work.lock().unwrap();
        if !s.teams.insert(name.to_string()) {
            bail!("duplicate key: teams.name = {name}");
        }
        Ok(())
    }

    async fn upsert_user(&self, u: &User) -> anyhow::Result<()> {
        self.with("upsert_user", |s| {
            s.users.insert(u.id.clone(), u.clone());
        })
    }

    async fn set_user_active(&self, id: &str, is_active: bool) -> anyhow::Result<bool> {
        self.with("set_user_active", |s| match s.users.get_mut(id) {
            Some(u) => {
                u.is_active = is_active;
                true
            }
            None => false,
        })
    }

    async fn save_pull_request(&self, pr: &PullRequest) -> anyhow::Result<()> {
        self.check("save_pull_request")?;
        let mut s = self.work.lock().unwrap();
        if s.prs.contains_key(&pr.id) {
            bail!("duplicate key: pull_requests.id = {}", pr.id);
        }
        let mut row = pr.clone();
        // links are stored separately
        row.assigned_reviewers.clear();
        s.prs.insert(pr.id.clone(), row);
        Ok(())
    }

    async fn save_reviewer_links(&self, pr_id: &str, user_ids: &[String]) -> anyhow::Result<()> {
        self.check("save_reviewer_links")?;
        self.insert_links(pr_id, user_ids)
    }

    async fn remove_reviewer_link(&self, pr_id: &str, user_id: &str) -> anyhow::Result<bool> {
        self.with("remove_reviewer_link", |s| match s.prs.get_mut(pr_id) {
            Some(pr) => {
                let before = pr.assigned_reviewers.len();
                pr.assigned_reviewers.retain(|r| r != user_id);
                pr.assigned_reviewers.len() != before
            }
            None => false,
        })
    }

    async fn add_reviewer_link(&self, pr_id: &str, user_id: &str) -> anyhow::Result<()> {
        self.check("add_reviewer_link")?;
        self.insert_links(pr_id, &[user_id.to_string()])
    }

    async fn mark_merged(&self, pr_id: &str, at: DateTime<Utc>) -> anyhow::Result<bool> {
        self.with("mark_merged", |s| match s.prs.get_mut(pr_id) {
            Some(pr) if pr.status == PullRequestStatus::Open => {
                pr.status = PullRequestStatus::Merged;
                pr.merged_at = Some(at);
                true
            }
            _ => false,
        })
    }

    async fn commit(self: Box<Self>) -> anyhow::Result<()> {
        self.check("commit")?;
        let MemoryTx {
            mut guard, work, ..
        } = *self;
        *guard = work.into_inner().unwrap();
        Ok(())
    }
}
