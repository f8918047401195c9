use clap::Parser;

use crate::repofile::layout::InterfaceLayout;
use crate::repofile::ExportFormat;
use crate::synth::{ConfigType, VlanKey};

pub const NO_DEVICES: &str = "Please provide at least one device name";

#[derive(Parser, Debug)]
#[command(name = "netbox-oc-synth")]
#[command(version)]
#[command(about = "Generate OpenConfig files from NetBox and open a merge request with them", long_about = None)]
pub struct Args {
    /// Device names as known to NetBox
    pub devices: Vec<String>,

    /// Branch to commit to [default: feature/niac-config-<unix time>]
    #[arg(short, long)]
    pub branch: Option<String>,

    /// Only generate interfaces with this name or tag (repeatable)
    #[arg(short, long)]
    pub filter: Vec<String>,

    /// INTERFACES, OSPF, VLANS, ACL or LACP (repeatable, default all)
    #[arg(short = 'c', long = "config-type")]
    pub config_types: Vec<String>,

    /// Use NetBox descriptions verbatim instead of deriving them
    #[arg(short = 'D', long)]
    pub explicit_descriptions: bool,

    #[arg(short = 'O', long, value_enum, default_value_t = ExportFormat::Yaml)]
    pub output_format: ExportFormat,

    /// Print the generated files instead of committing them
    #[arg(short = 'S', long)]
    pub stdout: bool,

    #[arg(long, value_enum, default_value_t = InterfaceLayout::Separate)]
    pub interface_layout: InterfaceLayout,

    /// NetBox VLAN field used as the OpenConfig VLAN key
    #[arg(long, value_enum, default_value_t = VlanKey::Id)]
    pub vlan_key: VlanKey,
}

impl Args {
    /// Check the soft constraints clap can't express.
    /// `Err` carries the message to print before exiting successfully.
    pub fn validate(&self) -> Result<Vec<ConfigType>, String> {
        if self.devices.is_empty() {
            return Err(NO_DEVICES.to_string());
        }

        let mut config_types = Vec::with_capacity(self.config_types.len());
        for raw in &self.config_types {
            let config_type = raw.parse::<ConfigType>().map_err(|bad| {
                let valid: Vec<&str> = ConfigType::ALL.iter().map(|t| t.as_str()).collect();
                format!("Invalid config type: {}. Valid config types: {}", bad, valid.join(", "))
            })?;
            if !config_types.contains(&config_type) {
                config_types.push(config_type);
            }
        }

        if !self.filter.is_empty() && !config_types.contains(&ConfigType::Interfaces) {
            return Err("--filter/-f flag only valid with INTERFACES config type".to_string());
        }
        Ok(config_types)
    }
}
