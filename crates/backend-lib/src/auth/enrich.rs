// ============================
// crates/backend-lib/src/auth/enrich.rs
// ============================
//! Attaches the role-specific profile to an authenticated user.
use std::sync::Arc;

use chrono::Timelike;
use chrono_tz::Tz;
use employee_common::{AgentProfile, EnrichedUser, Kind, Partner, RoleProfile, User};

use super::clock::Clock;
use super::work_time::WorkTime;
use crate::error::AuthError;
use crate::storage::RoleStore;

/// Resolves role sub-records and applies the suspension and work-time gates
#[derive(Clone)]
pub struct RoleEnricher {
    roles: Arc<dyn RoleStore>,
    clock: Arc<dyn Clock>,
    timezone: Tz,
}

impl RoleEnricher {
    pub fn new(roles: Arc<dyn RoleStore>, clock: Arc<dyn Clock>, timezone: Tz) -> Self {
        Self {
            roles,
            clock,
            timezone,
        }
    }

    /// Build the enriched user. Any failed fetch discards the whole result.
    #[tracing::instrument(skip_all, fields(user = %user.id, kind = %user.kind))]
    pub async fn enrich(&self, user: User) -> Result<EnrichedUser, AuthError> {
        let role = match user.kind {
            Kind::Administrator => {
                let admin = self
                    .roles
                    .get_admin_by_user_id(user.id)
                    .await
                    .map_err(|e| {
                        tracing::error!(error = %e, "admin profile lookup failed");
                        AuthError::CorruptAdminAccount
                    })?;
                if !admin.active {
                    return Err(AuthError::AccountSuspended);
                }
                RoleProfile::Administrator(admin)
            },
            Kind::Agent => {
                let agent = self
                    .roles
                    .get_agent_by_user_id(user.id)
                    .await
                    .map_err(|e| {
                        tracing::error!(error = %e, "agent profile lookup failed");
                        AuthError::CorruptAgentAccount
                    })?;
                if !agent.active {
                    return Err(AuthError::AccountSuspended);
                }
                let partners = self.agent_partners(agent.id).await?;
                RoleProfile::Agent(AgentProfile { agent, partners })
            },
            Kind::Partner | Kind::Unknown => RoleProfile::Unknown,
        };

        Ok(EnrichedUser { user, role })
    }

    /// Active partners of an agent that are inside their work window right now
    async fn agent_partners(&self, agent_id: i64) -> Result<Vec<Partner>, AuthError> {
        let links = self
            .roles
            .get_agent_partners_by_agent_id(agent_id)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, agent_id, "agent partner lookup failed");
                AuthError::FetchingAgentPartner
            })?;

        let now = self.clock.now().with_timezone(&self.timezone);
        let (hour, minute) = (now.hour(), now.minute());

        let mut partners = Vec::with_capacity(links.len());
        for link in links {
            let partner = self
                .roles
                .get_partner_by_id(link.partner_id)
                .await
                .map_err(|e| {
                    tracing::error!(error = %e, partner_id = link.partner_id, "partner lookup failed");
                    AuthError::FetchingPartner
                })?;
            if !partner.active {
                continue;
            }
            if in_work_time(&partner, hour, minute)? {
                partners.push(partner);
            }
        }
        Ok(partners)
    }
}

fn in_work_time(partner: &Partner, hour: u32, minute: u32) -> Result<bool, AuthError> {
    let settings = partner.settings().map_err(|e| {
        tracing::error!(error = %e, partner_id = partner.id, "unreadable partner settings");
        AuthError::FetchingPartner
    })?;
    match settings.work_time {
        Some((Some(from), Some(to))) => {
            let window = WorkTime::parse(&from, &to).map_err(|e| {
                tracing::error!(error = %e, partner_id = partner.id, "bad work time");
                AuthError::FetchingPartner
            })?;
            Ok(window.contains(hour, minute))
        },
        _ => Ok(true),
    }
}
