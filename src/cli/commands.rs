//! Non-interactive subcommands.

use crate::booking::{compute_slots, parse_duration, upcoming};
use crate::cli::common::{print_error, print_info, print_success, CliContext};
use crate::profile::{validators, Weekday};
use crate::session::Session;
use crate::utils::{expand_path, get_log_dir};
use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use std::process::ExitCode;
use tokio::runtime::Runtime;

fn runtime() -> Result<Runtime> {
    Runtime::new().context("Failed to create tokio runtime")
}

pub fn profile(ctx: &CliContext) -> Result<()> {
    let api = ctx.api_client()?;
    let profile = runtime()?.block_on(api.get_profile())?;

    println!("{} {}", profile.nombre, profile.apellido);
    println!("  Teléfono:  {}", profile.telefono);
    println!("  Dirección: {}", profile.direccion);
    println!("  Rol:       {}", profile.rol.as_deref().unwrap_or("-"));
    if let (Some(lat), Some(lon)) = (profile.latitud, profile.longitud) {
        println!("  Ubicación: {:.5}, {:.5}", lat, lon);
    }
    if let Some(url) = profile.photo_url(api.base_url()) {
        println!("  Foto:      {}", url);
    }

    if let Some(worker) = &profile.trabajador_profile {
        println!();
        println!("Disponibilidad:");
        let availability = worker.availability();
        for day in Weekday::ALL {
            println!("  {:<10} {}", day.label(), availability.summary(day));
        }
    }
    Ok(())
}

pub fn notifications(ctx: &CliContext, mark_read: bool) -> Result<()> {
    let api = ctx.api_client()?;
    let rt = runtime()?;
    let unread = rt.block_on(api.unread_notifications())?;
    match unread {
        0 => print_info("No tienes notificaciones nuevas"),
        1 => print_info("Tienes 1 notificación sin leer"),
        n => print_info(&format!("Tienes {} notificaciones sin leer", n)),
    }
    if mark_read && unread > 0 {
        rt.block_on(api.mark_notifications_read())?;
        print_success("Notificaciones marcadas como leídas");
    }
    Ok(())
}

pub fn slots(ctx: &CliContext, plan_id: u64, date: NaiveDate) -> Result<()> {
    let api = ctx.api_client()?;
    let rt = runtime()?;
    let plan = rt.block_on(api.get_plan(plan_id))?;
    let minutes = parse_duration(&plan.duracion_estimado)
        .with_context(|| format!("Plan {} has an invalid duration", plan.id))?;
    let reservations = rt.block_on(api.list_reservations(plan.id, date))?;
    let starts: Vec<&str> = reservations.iter().map(|r| r.hora_inicio.as_str()).collect();

    let slots = upcoming(compute_slots(minutes, &starts)?, date, Local::now().naive_local());
    println!("{} ({})", plan.nombre, date.format("%d-%m-%Y"));
    if slots.is_empty() {
        print_info("No quedan horarios para este día");
        return Ok(());
    }
    for slot in slots {
        if slot.busy {
            println!("  {}  ocupado", slot);
        } else {
            println!("  {}", slot);
        }
    }
    Ok(())
}

pub fn check_phone(value: &str) -> ExitCode {
    match validators::phone(value) {
        None => {
            print_success("Teléfono válido");
            ExitCode::SUCCESS
        }
        Some(message) => {
            print_error(&message);
            ExitCode::FAILURE
        }
    }
}

pub fn upload_photo(ctx: &CliContext, path: &str) -> Result<()> {
    let api = ctx.api_client()?;
    let path = expand_path(path);
    let id = runtime()?.block_on(api.upload_gallery_photo(&path))?;
    print_success(&format!("Foto subida (id {})", id));
    Ok(())
}

pub fn login(ctx: &CliContext, access: String, refresh: Option<String>) -> Result<()> {
    if access.trim().is_empty() {
        anyhow::bail!("The access token is empty");
    }
    let session = Session {
        access: access.trim().to_string(),
        refresh,
    };
    session.save(&ctx.session_path)?;
    print_success(&format!(
        "Sesión guardada en {:?} ({})",
        ctx.session_path,
        session.token_preview()
    ));
    Ok(())
}

pub fn logs() -> Result<()> {
    let log_file = get_log_dir().join("servimatch.log");
    println!("Logs: {}", log_file.display());
    println!("Ver en vivo: tail -f {:?}", log_file);
    println!("Más detalle: RUST_LOG=debug servimatch");
    Ok(())
}
