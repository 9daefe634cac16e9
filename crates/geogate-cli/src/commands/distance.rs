//! Distance command implementation

use crate::cli::DistanceArgs;
use crate::output::{meters, OutputWriter};
use crate::output_types::DistanceOutput;
use anyhow::Result;
use geogate_geo::{distance_meters, is_within};

pub fn execute(args: DistanceArgs, output: &OutputWriter) -> Result<()> {
    let distance = distance_meters(&args.from, &args.to)?;
    let within_radius = args.radius.map(|policy| is_within(distance, &policy));

    if output.is_json() {
        return output.result(DistanceOutput {
            from: args.from,
            to: args.to,
            distance_meters: distance,
            allowed_meters: args.radius.map(|policy| policy.allowed_meters()),
            within_radius,
        });
    }

    output.kv("From", args.from);
    output.kv("To", args.to);
    output.kv("Distance", format!("{} ({:.3} m)", meters(distance), distance));

    if let (Some(policy), Some(within)) = (args.radius, within_radius) {
        let allowed = meters(policy.allowed_meters());
        if within {
            output.success(format!("Within the allowed radius of {}", allowed));
        } else {
            output.warning(format!("Outside the allowed radius of {}", allowed));
        }
    }

    Ok(())
}
