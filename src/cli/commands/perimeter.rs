use crate::cli::commands::identity;
use crate::cli::parser::{Cli, Commands, PerimeterAction};
use crate::config::Config;
use crate::core::service::AttendanceService;
use crate::errors::AppResult;
use crate::models::location::LatLng;
use crate::ui::messages::{info, success, warning};
use crate::utils::time;

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let Commands::Perimeter { action } = &cli.command else {
        return Ok(());
    };

    let mut svc = AttendanceService::open(cfg)?;

    match action {
        PerimeterAction::Set {
            lat,
            lng,
            radius_km,
        } => {
            let who = identity(cli)?;
            let p = svc.set_perimeter(&who, LatLng::new(*lat, *lng), *radius_km)?;
            success(format!(
                "Perimeter set: center {}, radius {} km",
                p.center, p.radius_km
            ));
        }

        PerimeterAction::Show => match svc.get_perimeter()? {
            Some(p) => {
                println!("📍 Center : {}", p.center);
                println!("📏 Radius : {} km ({:.0} m)", p.radius_km, p.radius_meters());
                println!("🕒 Updated: {}", time::format_local(Some(&p.updated_at)));
            }
            None => warning("No perimeter configured: every clock-in will be rejected."),
        },

        PerimeterAction::Check { lat, lng } => {
            let res = svc.check_location(LatLng::new(*lat, *lng))?;
            match (res.distance_m, res.radius_m) {
                (Some(d), Some(r)) if res.inside => {
                    success(format!("Inside the work area ({d:.0} m from center, radius {r:.0} m)"))
                }
                (Some(d), Some(r)) => {
                    warning(format!("Outside the work area ({d:.0} m from center, radius {r:.0} m)"))
                }
                _ => info("No perimeter configured."),
            }
        }
    }

    Ok(())
}
