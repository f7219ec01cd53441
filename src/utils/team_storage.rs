// src/utils/team_storage.rs
use crate::models::{MemberDetails, ServiceError, Team, TeamData, TeamMember, TeamRole, TeamSummary, User};
use crate::utils::seed_date;
use chrono::Utc;
use log::{debug, info};
use std::sync::{Arc, Mutex};

// Teams plus the fixed user directory they draw members from
#[derive(Clone)]
pub struct TeamRegistry {
    teams: Arc<Mutex<Vec<Team>>>,
    users: Arc<Vec<User>>,
    current_user_id: String,
}

impl TeamRegistry {
    pub fn new(users: Vec<User>, teams: Vec<Team>, current_user_id: &str) -> Self {
        Self {
            teams: Arc::new(Mutex::new(teams)),
            users: Arc::new(users),
            current_user_id: current_user_id.to_string(),
        }
    }

    pub fn seeded(current_user_id: &str) -> Self {
        Self::new(seed_users(), seed_teams(), current_user_id)
    }

    // Create a team owned by the current user
    pub fn create_team(&self, data: TeamData) -> Result<Team, ServiceError> {
        let mut teams = self.teams.lock()?;
        let team_id = (teams.len() + 1).to_string();
        let now = Utc::now();

        let team = Team {
            id: team_id.clone(),
            name: data.name,
            description: Some(data.description),
            members: vec![TeamMember {
                user_id: self.current_user_id.clone(),
                team_id,
                role: TeamRole::Owner,
                joined_at: now,
            }],
            created_at: now,
        };

        teams.push(team.clone());
        info!("✅ Stored team: {} ({})", team.id, team.name);

        Ok(team)
    }

    // Append a member record. Duplicates are not rejected here; the invite
    // search is what keeps existing members out of the picker.
    pub fn add_member(&self, team_id: &str, user_id: &str) -> Result<TeamMember, ServiceError> {
        if self.get_user(user_id).is_none() {
            return Err(ServiceError::NotFound);
        }

        let mut teams = self.teams.lock()?;
        let team = teams
            .iter_mut()
            .find(|t| t.id == team_id)
            .ok_or(ServiceError::NotFound)?;

        let member = TeamMember {
            user_id: user_id.to_string(),
            team_id: team_id.to_string(),
            role: TeamRole::Member,
            joined_at: Utc::now(),
        };
        team.members.push(member.clone());

        debug!("Team {} now has {} members", team_id, team.members.len());
        Ok(member)
    }

    // Users not yet on the team whose name or email contains the query
    pub fn search(&self, team_id: &str, query: &str) -> Result<Vec<User>, ServiceError> {
        let team = self.get_team(team_id)?.ok_or(ServiceError::NotFound)?;
        let needle = query.to_lowercase();

        Ok(self
            .users
            .iter()
            .filter(|user| !team.has_member(&user.id))
            .filter(|user| {
                user.name.to_lowercase().contains(&needle)
                    || user.email.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect())
    }

    pub fn list_teams(&self) -> Result<Vec<TeamSummary>, ServiceError> {
        let teams = self.teams.lock()?;
        Ok(teams
            .iter()
            .map(|t| TeamSummary {
                id: t.id.clone(),
                name: t.name.clone(),
                member_count: t.members.len(),
            })
            .collect())
    }

    pub fn first_team_id(&self) -> Result<Option<String>, ServiceError> {
        Ok(self.teams.lock()?.first().map(|t| t.id.clone()))
    }

    pub fn get_team(&self, team_id: &str) -> Result<Option<Team>, ServiceError> {
        let teams = self.teams.lock()?;
        Ok(teams.iter().find(|t| t.id == team_id).cloned())
    }

    // Memberships whose user is missing from the directory are skipped
    pub fn members_with_users(&self, team_id: &str) -> Result<Vec<MemberDetails>, ServiceError> {
        let team = self.get_team(team_id)?.ok_or(ServiceError::NotFound)?;

        Ok(team
            .members
            .iter()
            .filter_map(|member| {
                let user = self.get_user(&member.user_id)?;
                Some(MemberDetails {
                    user_id: user.id.clone(),
                    name: user.name.clone(),
                    email: user.email.clone(),
                    avatar_url: user.avatar_url.clone(),
                    role: member.role,
                    joined_at: member.joined_at,
                })
            })
            .collect())
    }

    pub fn list_users(&self) -> Vec<User> {
        self.users.as_ref().clone()
    }

    pub fn get_user(&self, user_id: &str) -> Option<User> {
        self.users.iter().find(|u| u.id == user_id).cloned()
    }
}

fn seed_users() -> Vec<User> {
    vec![
        User {
            id: "1".to_string(),
            name: "Alice Johnson".to_string(),
            email: "alice@example.com".to_string(),
            role: TeamRole::Owner,
            avatar_url: Some(
                "https://images.unsplash.com/photo-1494790108377-be9c29b29330?auto=format&fit=crop&q=80"
                    .to_string(),
            ),
        },
        User {
            id: "2".to_string(),
            name: "Bob Smith".to_string(),
            email: "bob@example.com".to_string(),
            role: TeamRole::Admin,
            avatar_url: Some(
                "https://images.unsplash.com/photo-1472099645785-5658abf4ff4e?auto=format&fit=crop&q=80"
                    .to_string(),
            ),
        },
    ]
}

fn seed_teams() -> Vec<Team> {
    vec![Team {
        id: "1".to_string(),
        name: "3D Design Team".to_string(),
        description: Some("Main product design team".to_string()),
        members: vec![
            TeamMember {
                user_id: "1".to_string(),
                team_id: "1".to_string(),
                role: TeamRole::Owner,
                joined_at: seed_date(2024, 1, 1),
            },
            TeamMember {
                user_id: "2".to_string(),
                team_id: "1".to_string(),
                role: TeamRole::Admin,
                joined_at: seed_date(2024, 1, 2),
            },
        ],
        created_at: seed_date(2024, 1, 1),
    }]
}
