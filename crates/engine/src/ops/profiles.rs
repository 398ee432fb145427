//! Registration and supervisor management.
//!
//! Registration decides the tenant a new account belongs to: a principal
//! whose email matches a supervisor invitation registers as a member of the
//! inviting owner's tenant, anyone else becomes an owner of a fresh tenant.
//! Supervisor management itself is restricted to owners.

use chrono::Utc;
use sea_orm::{QueryFilter, QueryOrder, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, Principal, Profile, ResultEngine, Role, Supervisor, Tenant, Topic, profiles,
    supervisors,
};

use super::{Engine, normalize_required_text};

impl Engine {
    /// Register a profile for a freshly authenticated principal.
    ///
    /// The role is decided here and never re-evaluated: matching a supervisor
    /// invitation at this moment makes the account a member of the inviting
    /// owner's tenant for good.
    pub async fn register_profile(&self, principal: &Principal) -> ResultEngine<Profile> {
        let email = normalize_required_text(&principal.email, "email")?.to_lowercase();

        let existing = profiles::Entity::find_by_id(principal.id.clone())
            .one(&self.database)
            .await?;
        if existing.is_some() {
            return Err(EngineError::Validation(
                "profile already registered".to_string(),
            ));
        }
        let email_taken = profiles::Entity::find()
            .filter(profiles::Column::Email.eq(email.clone()))
            .one(&self.database)
            .await?;
        if email_taken.is_some() {
            return Err(EngineError::Validation(format!(
                "email {email} already registered"
            )));
        }

        let invitation = supervisors::Entity::find()
            .filter(supervisors::Column::Email.eq(email.clone()))
            .one(&self.database)
            .await?;

        let profile = match invitation {
            Some(supervisor) => Profile {
                id: principal.id.clone(),
                email,
                role: Role::Member,
                owner_id: Some(supervisor.owner_id),
            },
            None => Profile {
                id: principal.id.clone(),
                email,
                role: Role::Owner,
                owner_id: None,
            },
        };

        profiles::ActiveModel::from(&profile)
            .insert(&self.database)
            .await?;
        tracing::debug!(id = %profile.id, role = profile.role.as_str(), "profile registered");
        Ok(profile)
    }

    /// Supervisors invited by the current owner, newest first.
    pub async fn list_supervisors(&self) -> ResultEngine<Vec<Supervisor>> {
        let tenant = self.require_owner()?;
        let models = supervisors::Entity::find()
            .filter(supervisors::Column::OwnerId.eq(tenant.owner_id))
            .order_by_desc(supervisors::Column::CreatedAt)
            .all(&self.database)
            .await?;
        models.into_iter().map(Supervisor::try_from).collect()
    }

    /// Invite a supervisor. Whoever registers with this email afterwards
    /// joins the current owner's tenant as a member.
    pub async fn add_supervisor(
        &self,
        name: &str,
        email: &str,
        phone: Option<String>,
    ) -> ResultEngine<Uuid> {
        let tenant = self.require_owner()?;
        let name = normalize_required_text(name, "supervisor name")?;
        let email = normalize_required_text(email, "supervisor email")?.to_lowercase();

        let duplicate = supervisors::Entity::find()
            .filter(supervisors::Column::Email.eq(email.clone()))
            .one(&self.database)
            .await?;
        if duplicate.is_some() {
            return Err(EngineError::Validation(format!(
                "supervisor with email {email} already invited"
            )));
        }

        let supervisor = Supervisor::new(name, email, phone, tenant.owner_id, Utc::now());
        let supervisor_id = supervisor.id;
        supervisors::ActiveModel::from(&supervisor)
            .insert(&self.database)
            .await?;
        self.publish(&[Topic::Supervisors]);
        Ok(supervisor_id)
    }

    /// Withdraw an invitation. Accounts that already registered through it
    /// keep their membership.
    pub async fn delete_supervisor(&self, supervisor_id: Uuid) -> ResultEngine<()> {
        let tenant = self.require_owner()?;
        let model = supervisors::Entity::find_by_id(supervisor_id.to_string())
            .filter(supervisors::Column::OwnerId.eq(tenant.owner_id))
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::EntityNotFound("supervisor".to_string()))?;
        supervisors::Entity::delete_by_id(model.id)
            .exec(&self.database)
            .await?;
        self.publish(&[Topic::Supervisors]);
        Ok(())
    }

    fn require_owner(&self) -> ResultEngine<Tenant> {
        let tenant = self.require_tenant()?;
        if tenant.role != Role::Owner {
            return Err(EngineError::Unauthenticated);
        }
        Ok(tenant)
    }
}
