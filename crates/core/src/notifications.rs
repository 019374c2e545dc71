//! Applicant-facing emails sent by the booking and cancellation engines.

use chrono::NaiveDate;

use crate::models::{applicant::Applicant, interview_day::InterviewDay, reservation::Reservation};
use crate::notify::Email;
use crate::scheduling::SchedulerSettings;

pub fn booking_confirmation(
    applicant: &Applicant,
    day: &InterviewDay,
    reservation: &Reservation,
    settings: &SchedulerSettings,
) -> Email {
    let html = format!(
        r#"<div style="font-family: Arial, sans-serif; line-height: 1.6; color: #333; max-width: 600px; margin: 0 auto;">
  <h2>Tu cita de entrevista está confirmada</h2>
  <p>Estimado/a <strong>{name}</strong>,</p>
  <p>Tu entrevista ha sido agendada con éxito.</p>
  <h3>Detalles de tu entrevista</h3>
  <p><strong>Cargo postulado:</strong> {role}</p>
  <p><strong>Fecha:</strong> {date}</p>
  <p><strong>Hora:</strong> {window}</p>
  <p><strong>Lugar:</strong> {location}</p>
  <p><strong>Ficho de ingreso:</strong> <span style="font-size: 20px; font-weight: bold;">{ticket}</span></p>
  <p>Llega unos minutos antes y presenta este correo junto con tu documento de identidad original.</p>
  <p style="font-size: 12px; color: #777;">Este es un mensaje automático de {organization}, por favor no respondas a este correo.</p>
</div>"#,
        name = escape_html(&applicant.full_name),
        role = escape_html(&applicant.role),
        date = format_date(day.date),
        window = escape_html(&reservation.time_window),
        location = escape_html(&settings.location),
        ticket = escape_html(&reservation.ticket_code),
        organization = escape_html(&settings.organization),
    );

    Email {
        to: vec![applicant.email.clone()],
        subject: format!(
            "Confirmación de cita de entrevista - Ficho: {}",
            reservation.ticket_code
        ),
        html,
    }
}

pub fn cancellation_notice(
    applicant: &Applicant,
    day: Option<&InterviewDay>,
    reservation: &Reservation,
    settings: &SchedulerSettings,
) -> Email {
    let date = day
        .map(|day| format_date(day.date))
        .unwrap_or_else(|| "sin fecha".to_string());

    let html = format!(
        r#"<div style="font-family: Arial, sans-serif; line-height: 1.6; color: #333; max-width: 600px; margin: 0 auto;">
  <h2>Tu cita de entrevista fue cancelada</h2>
  <p>Estimado/a <strong>{name}</strong>,</p>
  <p>La entrevista del <strong>{date}</strong> ({window}) con el ficho <strong>{ticket}</strong> fue cancelada.</p>
  <p>Puedes agendar un nuevo espacio cuando quieras desde el portal de postulaciones.</p>
  <p style="font-size: 12px; color: #777;">Este es un mensaje automático de {organization}, por favor no respondas a este correo.</p>
</div>"#,
        name = escape_html(&applicant.full_name),
        date = date,
        window = escape_html(&reservation.time_window),
        ticket = escape_html(&reservation.ticket_code),
        organization = escape_html(&settings.organization),
    );

    Email {
        to: vec![applicant.email.clone()],
        subject: format!(
            "Cancelación de cita de entrevista - Ficho: {}",
            reservation.ticket_code
        ),
        html,
    }
}

/// Colombian short date, e.g. `09/07/2025`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
