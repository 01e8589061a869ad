use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use keel::DeploymentForm;

use crate::output::OutputFormat;
use crate::store::DEFAULT_PROFILE_NAME;

#[derive(Parser, Debug)]
#[command(name = "keel")]
#[command(about = "Manage cloud credential sessions from the command line", long_about = None)]
#[command(version)]
pub struct Cli {
	/// Workspace file (defaults to the user config directory)
	#[arg(long, global = true, value_name = "FILE")]
	pub workspace: Option<PathBuf>,

	/// Deployment form the host binds its I/O for
	#[arg(long, global = true, value_enum, default_value_t = Form::Cli)]
	pub form: Form,

	/// Output format
	#[arg(short = 'f', long, global = true, value_enum, default_value_t = OutputFormat::Text)]
	pub format: OutputFormat,

	/// Print URLs instead of launching a browser
	#[arg(long, global = true)]
	pub no_browser: bool,

	/// Increase verbosity (-v info, -vv debug)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	pub verbose: u8,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Form {
	Desktop,
	Cli,
}

impl From<Form> for DeploymentForm {
	fn from(form: Form) -> Self {
		match form {
			Form::Desktop => DeploymentForm::Desktop,
			Form::Cli => DeploymentForm::Cli,
		}
	}
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Manage sessions
	#[command(subcommand)]
	Session(SessionCommand),

	/// Print credentials issued for a session
	Credentials {
		/// Session id
		id: String,
	},

	/// Open a URL outside the CLI
	Open {
		url: String,
	},

	/// Fetch a URL through the host's native I/O
	Fetch {
		url: String,
	},

	/// Manage named AWS profiles
	#[command(subcommand)]
	Profile(ProfileCommand),

	/// Manage identity-provider URLs
	#[command(subcommand)]
	Idp(IdpCommand),

	/// Run a command in a terminal
	Terminal {
		command: String,

		/// Environment variable to set (repeatable)
		#[arg(long = "env", value_name = "KEY=VALUE", value_parser = parse_env_pair)]
		env: Vec<(String, String)>,
	},
}

#[derive(Subcommand, Debug)]
pub enum SessionCommand {
	/// List sessions in the workspace
	List,

	/// Create a session
	#[command(subcommand)]
	Create(SessionForm),

	/// Duplicate a session
	Clone {
		id: String,
	},

	/// Replace a session's configuration
	Update {
		id: String,
		#[command(subcommand)]
		form: SessionForm,
	},

	/// Start a session
	Start {
		id: String,
	},

	/// Stop a session
	Stop {
		id: String,
	},

	/// Pin a session
	Pin {
		id: String,
	},

	/// Unpin a session
	Unpin {
		id: String,
	},

	/// Delete a session
	Delete {
		id: String,
	},

	/// Open the AWS web console for a session's region
	Console {
		id: String,
	},

	/// Show the actions available for a session
	Actions {
		id: String,

		/// Only the primary toggles
		#[arg(long)]
		compact: bool,
	},

	/// Change a session's region
	Region {
		id: String,
		region: String,
	},

	/// Change a session's named profile
	Profile {
		id: String,
		/// Profile name
		profile: String,
	},

	/// Start an SSM shell on an instance
	Ssm {
		id: String,
		instance: String,
	},
}

/// Session configuration, one variant per creatable type.
#[derive(Subcommand, Debug)]
pub enum SessionForm {
	/// IAM user with long-lived access keys
	IamUser(IamUserArgs),

	/// IAM role federated through a SAML identity provider
	Federated(FederatedArgs),

	/// IAM role assumed from a parent session
	Chained(ChainedArgs),
}

#[derive(Args, Debug)]
pub struct IamUserArgs {
	#[arg(long)]
	pub name: String,
	#[arg(long)]
	pub access_key: String,
	#[arg(long)]
	pub secret_key: String,
	#[arg(long)]
	pub region: String,
	/// MFA device ARN
	#[arg(long)]
	pub mfa_device: Option<String>,
	/// Named profile
	#[arg(long, default_value = DEFAULT_PROFILE_NAME)]
	pub profile: String,
}

#[derive(Args, Debug)]
pub struct FederatedArgs {
	#[arg(long)]
	pub name: String,
	#[arg(long)]
	pub region: String,
	#[arg(long)]
	pub role_arn: String,
	/// SAML provider ARN
	#[arg(long)]
	pub idp_arn: String,
	/// Identity-provider login URL (must be registered with `idp add`)
	#[arg(long)]
	pub idp_url: String,
	#[arg(long, default_value = DEFAULT_PROFILE_NAME)]
	pub profile: String,
}

#[derive(Args, Debug)]
pub struct ChainedArgs {
	#[arg(long)]
	pub name: String,
	#[arg(long)]
	pub region: String,
	#[arg(long)]
	pub role_arn: String,
	/// Session the role is assumed from
	#[arg(long)]
	pub parent: String,
	#[arg(long)]
	pub role_session_name: Option<String>,
	#[arg(long, default_value = DEFAULT_PROFILE_NAME)]
	pub profile: String,
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommand {
	/// List named profiles
	List,
	/// Add a named profile
	Add { name: String },
	/// Print the id of a named profile
	Resolve { name: String },
}

#[derive(Subcommand, Debug)]
pub enum IdpCommand {
	/// List identity-provider URLs
	List,
	/// Register an identity-provider URL
	Add { url: String },
	/// Print the id of an identity-provider URL
	Resolve { url: String },
}

fn parse_env_pair(raw: &str) -> Result<(String, String), String> {
	match raw.split_once('=') {
		Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
		_ => Err(format!("expected KEY=VALUE, got `{raw}`")),
	}
}
