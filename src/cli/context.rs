use chrono::{DateTime, Utc};
use rusqlite::Connection;
use std::io::{self, Write};

use crate::db::{appointment_repo, lead_repo, user_repo};
use crate::model::*;
use crate::queries::pool_queries;
use crate::store::{PoolStore, SettingsStore};

pub struct CLIContext {
    pub conn: Connection,
    pub user: User,
}

impl CLIContext {
    pub fn new(conn: Connection, user: User) -> Self {
        Self { conn, user }
    }

    pub fn user_id(&self) -> &Id<User> {
        &self.user.id
    }

    pub fn access(&self) -> Access {
        Access::for_role(self.user.role)
    }

    /// Pool store backed by this session's database.
    pub fn pools(&self) -> PoolStore<&Connection> {
        PoolStore::new(&self.conn)
    }

    /// Settings store backed by this session's database.
    pub fn settings(&self) -> SettingsStore<&Connection> {
        SettingsStore::new(&self.conn)
    }

    pub fn now() -> DateTime<Utc> {
        Utc::now()
    }

    /// Prompt and read a line from stdin. Returns None on EOF.
    pub fn read_line(&self, prompt: &str) -> Option<String> {
        print!("{}", prompt);
        io::stdout().flush().ok();
        let mut buf = String::new();
        match io::stdin().read_line(&mut buf) {
            Ok(0) => None,
            Ok(_) => Some(buf.trim_end_matches('\n').trim_end_matches('\r').to_string()),
            Err(_) => None,
        }
    }

    /// Read a line, trimmed.
    pub fn prompt(&self, prompt: &str) -> Option<String> {
        self.read_line(prompt).map(|s| s.trim().to_string())
    }

    /// Find a pool by id or name. Prints an error if not found.
    pub fn find_pool(&self, query: &str) -> Option<Pool> {
        let pools = self.pools().load_pools();
        match pool_queries::find_pool(&pools, query) {
            Some(p) => Some(p.clone()),
            None => {
                println!("No pool found matching '{}'", query.trim());
                None
            }
        }
    }

    /// Find a lead by id or id prefix. Prints an error if not found or ambiguous.
    pub fn find_lead(&self, query: &str) -> Option<Lead> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }

        let leads = lead_repo::find_all(&self.conn).unwrap_or_default();
        let matches: Vec<&Lead> = leads
            .iter()
            .filter(|l| l.id.as_str().starts_with(query))
            .collect();

        match matches.len() {
            0 => {
                println!("No lead found matching '{}'", query);
                None
            }
            1 => Some(matches[0].clone()),
            _ => {
                if let Some(exact) = matches.iter().find(|l| l.id.as_str() == query) {
                    return Some((*exact).clone());
                }
                println!("Multiple leads match '{}':", query);
                for l in &matches {
                    println!("  {}  {}", l.id, l.name);
                }
                println!("Please be more specific.");
                None
            }
        }
    }

    /// Find an appointment by the first characters of its id.
    pub fn find_appointment(&self, query: &str) -> Option<Appointment> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }

        let appts = appointment_repo::find_all(&self.conn).unwrap_or_default();
        let matches: Vec<&Appointment> = appts
            .iter()
            .filter(|a| a.id.as_str().starts_with(query))
            .collect();

        match matches.as_slice() {
            [] => {
                println!("No appointment found matching '{}'", query);
                None
            }
            [only] => Some((*only).clone()),
            _ => {
                if let Some(exact) = matches.iter().find(|a| a.id.as_str() == query) {
                    return Some((*exact).clone());
                }
                println!("Multiple appointments match '{}':", query);
                for a in &matches {
                    println!("  {}  {} {}", a.id, a.lead_name, a.at.format("%b %d %H:%M"));
                }
                println!("Please be more specific.");
                None
            }
        }
    }

    /// Find a user account by id or name.
    pub fn find_user(&self, query: &str) -> Option<User> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }

        let users = user_repo::find_all(&self.conn).unwrap_or_default();
        if let Some(u) = users.iter().find(|u| u.id.as_str() == query) {
            return Some(u.clone());
        }

        let lower = query.to_lowercase();
        let matches: Vec<&User> = users
            .iter()
            .filter(|u| u.name.to_lowercase().contains(&lower))
            .collect();

        match matches.len() {
            0 => {
                println!("No user found matching '{}'", query);
                None
            }
            1 => Some(matches[0].clone()),
            _ => {
                println!("Multiple matches found:");
                for u in &matches {
                    println!("  {}  {}", u.id, u.name);
                }
                println!("Please be more specific.");
                None
            }
        }
    }

    /// Refuse and explain when the session can't edit the board.
    pub fn require_edit(&self) -> bool {
        if self.access().can_edit() {
            true
        } else {
            println!(
                "Role '{}' can view the rotation but not change it.",
                self.user.role.as_str()
            );
            false
        }
    }

    /// Print an error.
    pub fn print_error(&self, e: &crate::error::CrmError) {
        println!("Error: {}", e);
    }
}
