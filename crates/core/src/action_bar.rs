//! Action bar bound to the currently selected session.
//!
//! The bar owns no behavior: every operation forwards to a
//! [`SelectedSessionActions`] implementation supplied by the application.
//! [`ActionBar::available_actions`] reports which operations fit the
//! selected session's type and status.

use async_trait::async_trait;
use keel_protocol::{Session, SessionData, SessionStatus};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Operations the application performs on a selected session.
#[async_trait]
pub trait SelectedSessionActions: Send + Sync {
	fn is_pinned(&self, session: &Session) -> bool;

	async fn start_session(&self, session: &Session) -> Result<()>;

	async fn stop_session(&self, session: &Session) -> Result<()>;

	async fn open_aws_web_console(&self, session: &Session) -> Result<()>;

	async fn change_region(&self, session: &Session, region: &str) -> Result<()>;

	async fn change_profile(&self, session: &Session, profile_id: &str) -> Result<()>;

	/// Starts an SSM shell on `instance_id` using the session's credentials.
	async fn open_ssm(&self, session: &Session, instance_id: &str) -> Result<()>;

	/// Replaces the session's configuration with `descriptor`.
	async fn edit_session(&self, session: &Session, descriptor: &dyn SessionData) -> Result<()>;

	async fn pin_session(&self, session: &Session) -> Result<()>;

	async fn unpin_session(&self, session: &Session) -> Result<()>;

	async fn delete_session(&self, session: &Session) -> Result<()>;
}

/// Buttons the bar can offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BarAction {
	Start,
	Stop,
	WebConsole,
	ChangeRegion,
	ChangeProfile,
	Ssm,
	Edit,
	Pin,
	Unpin,
	Delete,
}

/// Delegating facade over the actions of one selected session.
pub struct ActionBar<'a> {
	session: &'a Session,
	compact: bool,
	actions: &'a dyn SelectedSessionActions,
}

impl<'a> ActionBar<'a> {
	pub fn new(session: &'a Session, actions: &'a dyn SelectedSessionActions) -> Self {
		Self {
			session,
			compact: false,
			actions,
		}
	}

	/// Compact bars only offer start/stop and pin/unpin.
	pub fn compact(mut self, compact: bool) -> Self {
		self.compact = compact;
		self
	}

	pub fn selected_session(&self) -> &'a Session {
		self.session
	}

	pub fn is_pinned(&self) -> bool {
		self.actions.is_pinned(self.session)
	}

	/// Actions that apply to the selected session, in display order.
	pub fn available_actions(&self) -> Vec<BarAction> {
		let session_type = self.session.session_type;
		let mut available = Vec::new();

		if self.session.is_running() {
			available.push(BarAction::Stop);
		} else {
			available.push(BarAction::Start);
		}

		if !self.compact {
			if session_type.is_aws() {
				available.extend([BarAction::WebConsole, BarAction::ChangeRegion, BarAction::ChangeProfile]);
				if self.session.status == SessionStatus::Active {
					available.push(BarAction::Ssm);
				}
			}
			if session_type.is_creatable() {
				available.push(BarAction::Edit);
			}
		}

		available.push(if self.is_pinned() { BarAction::Unpin } else { BarAction::Pin });

		if !self.compact {
			available.push(BarAction::Delete);
		}
		available
	}

	pub async fn start_session(&self) -> Result<()> {
		self.actions.start_session(self.session).await
	}

	pub async fn stop_session(&self) -> Result<()> {
		self.actions.stop_session(self.session).await
	}

	pub async fn open_aws_web_console(&self) -> Result<()> {
		self.actions.open_aws_web_console(self.session).await
	}

	pub async fn change_region(&self, region: &str) -> Result<()> {
		self.actions.change_region(self.session, region).await
	}

	pub async fn change_profile(&self, profile_id: &str) -> Result<()> {
		self.actions.change_profile(self.session, profile_id).await
	}

	pub async fn open_ssm(&self, instance_id: &str) -> Result<()> {
		self.actions.open_ssm(self.session, instance_id).await
	}

	pub async fn edit_session(&self, descriptor: &dyn SessionData) -> Result<()> {
		self.actions.edit_session(self.session, descriptor).await
	}

	pub async fn pin_session(&self) -> Result<()> {
		self.actions.pin_session(self.session).await
	}

	pub async fn unpin_session(&self) -> Result<()> {
		self.actions.unpin_session(self.session).await
	}

	pub async fn delete_session(&self) -> Result<()> {
		self.actions.delete_session(self.session).await
	}
}

#[cfg(test)]
mod tests {
	use keel_protocol::SessionType;
	use parking_lot::Mutex;

	use super::*;

	#[derive(Default)]
	struct Recorder {
		pinned: bool,
		calls: Mutex<Vec<String>>,
	}

	impl Recorder {
		fn record(&self, call: String) -> Result<()> {
			self.calls.lock().push(call);
			Ok(())
		}
	}

	#[async_trait]
	impl SelectedSessionActions for Recorder {
		fn is_pinned(&self, _session: &Session) -> bool {
			self.pinned
		}

		async fn start_session(&self, session: &Session) -> Result<()> {
			self.record(format!("start:{}", session.session_id))
		}

		async fn stop_session(&self, session: &Session) -> Result<()> {
			self.record(format!("stop:{}", session.session_id))
		}

		async fn open_aws_web_console(&self, session: &Session) -> Result<()> {
			self.record(format!("console:{}", session.session_id))
		}

		async fn change_region(&self, session: &Session, region: &str) -> Result<()> {
			self.record(format!("region:{}:{region}", session.session_id))
		}

		async fn change_profile(&self, session: &Session, profile_id: &str) -> Result<()> {
			self.record(format!("profile:{}:{profile_id}", session.session_id))
		}

		async fn open_ssm(&self, session: &Session, instance_id: &str) -> Result<()> {
			self.record(format!("ssm:{}:{instance_id}", session.session_id))
		}

		async fn edit_session(&self, session: &Session, descriptor: &dyn SessionData) -> Result<()> {
			self.record(format!("edit:{}:{}", session.session_id, descriptor.session_type()))
		}

		async fn pin_session(&self, session: &Session) -> Result<()> {
			self.record(format!("pin:{}", session.session_id))
		}

		async fn unpin_session(&self, session: &Session) -> Result<()> {
			self.record(format!("unpin:{}", session.session_id))
		}

		async fn delete_session(&self, session: &Session) -> Result<()> {
			self.record(format!("delete:{}", session.session_id))
		}
	}

	fn session(session_type: SessionType, status: SessionStatus) -> Session {
		Session {
			session_id: "s1".into(),
			session_name: "dev".into(),
			session_type,
			status,
			region: "eu-west-1".into(),
			profile_id: None,
			request: None,
		}
	}

	#[tokio::test]
	async fn operations_forward_the_selected_session() {
		let recorder = Recorder::default();
		let selected = session(SessionType::AwsIamUser, SessionStatus::Inactive);
		let bar = ActionBar::new(&selected, &recorder);

		bar.start_session().await.unwrap();
		bar.change_region("us-east-1").await.unwrap();
		bar.open_ssm("i-0abc").await.unwrap();
		bar.pin_session().await.unwrap();
		bar.delete_session().await.unwrap();

		assert_eq!(
			*recorder.calls.lock(),
			vec!["start:s1", "region:s1:us-east-1", "ssm:s1:i-0abc", "pin:s1", "delete:s1"]
		);
	}

	#[test]
	fn inactive_aws_session_offers_start_and_aws_tools() {
		let recorder = Recorder::default();
		let selected = session(SessionType::AwsIamRoleFederated, SessionStatus::Inactive);
		let actions = ActionBar::new(&selected, &recorder).available_actions();
		assert_eq!(
			actions,
			vec![
				BarAction::Start,
				BarAction::WebConsole,
				BarAction::ChangeRegion,
				BarAction::ChangeProfile,
				BarAction::Edit,
				BarAction::Pin,
				BarAction::Delete,
			]
		);
	}

	#[test]
	fn active_sso_session_offers_ssm_but_not_edit() {
		let recorder = Recorder {
			pinned: true,
			..Default::default()
		};
		let selected = session(SessionType::AwsSsoRole, SessionStatus::Active);
		let actions = ActionBar::new(&selected, &recorder).available_actions();
		assert!(actions.contains(&BarAction::Stop));
		assert!(actions.contains(&BarAction::Ssm));
		assert!(actions.contains(&BarAction::Unpin));
		assert!(!actions.contains(&BarAction::Edit));
		assert!(!actions.contains(&BarAction::Start));
	}

	#[test]
	fn azure_session_has_no_aws_tools() {
		let recorder = Recorder::default();
		let selected = session(SessionType::Azure, SessionStatus::Pending);
		let actions = ActionBar::new(&selected, &recorder).available_actions();
		assert_eq!(actions, vec![BarAction::Stop, BarAction::Pin, BarAction::Delete]);
	}

	#[test]
	fn compact_bar_keeps_only_primary_toggles() {
		let recorder = Recorder::default();
		let selected = session(SessionType::AwsIamUser, SessionStatus::Active);
		let actions = ActionBar::new(&selected, &recorder).compact(true).available_actions();
		assert_eq!(actions, vec![BarAction::Stop, BarAction::Pin]);
	}

	#[test]
	fn actions_serialize_in_kebab_case() {
		let json = serde_json::to_value([BarAction::WebConsole, BarAction::ChangeRegion]).unwrap();
		assert_eq!(json, serde_json::json!(["web-console", "change-region"]));
	}
}
