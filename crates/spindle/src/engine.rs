use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use rhai::{
    default_limits::MAX_STRINGS_INTERNED,
    packages::{Package, StandardPackage},
    Engine, EvalAltResult, Position, INT,
};

use crate::config::EvalConfig;

pub(crate) fn build_engine(config: &EvalConfig) -> Engine {
    let mut engine = Engine::new_raw();
    engine.register_global_module(StandardPackage::new().as_shared_module());

    engine.set_max_strings_interned(MAX_STRINGS_INTERNED);
    engine.set_strict_variables(true);
    engine.set_fail_on_invalid_map_property(true);

    engine.set_max_operations(config.max_operations);
    engine.set_max_call_levels(config.max_call_levels);
    engine.set_max_expr_depths(config.max_expr_depth, config.max_function_expr_depth);
    engine.set_max_string_size(config.max_string_size);
    engine.set_max_array_size(config.max_array_size);
    engine.set_max_map_size(config.max_map_size);
    engine.set_max_variables(config.max_variables);
    engine.set_max_functions(config.max_functions);
    engine.set_max_modules(config.max_modules);

    register_datetime(&mut engine);

    engine
}

/// Rhai has no native date object, so calendar datetimes cross the bridge as
/// a registered custom type. Scripts read the six calendar fields through
/// getters (`month` is 1-based) and build new values with `datetime(...)`.
fn register_datetime(engine: &mut Engine) {
    engine.register_type_with_name::<NaiveDateTime>("DateTime");

    engine.register_get("year", |dt: &mut NaiveDateTime| dt.year() as INT);
    engine.register_get("month", |dt: &mut NaiveDateTime| dt.month() as INT);
    engine.register_get("day", |dt: &mut NaiveDateTime| dt.day() as INT);
    engine.register_get("hour", |dt: &mut NaiveDateTime| dt.hour() as INT);
    engine.register_get("minute", |dt: &mut NaiveDateTime| dt.minute() as INT);
    engine.register_get("second", |dt: &mut NaiveDateTime| dt.second() as INT);
    engine.register_fn("to_string", |dt: &mut NaiveDateTime| dt.to_string());

    engine.register_fn(
        "datetime",
        |year: INT,
         month: INT,
         day: INT,
         hour: INT,
         minute: INT,
         second: INT|
         -> Result<NaiveDateTime, Box<EvalAltResult>> {
            calendar_fields(year, month, day, hour, minute, second).ok_or_else(|| {
                EvalAltResult::ErrorRuntime(
                    format!(
                        "invalid datetime: {year:04}-{month:02}-{day:02} \
                         {hour:02}:{minute:02}:{second:02}"
                    )
                    .into(),
                    Position::NONE,
                )
                .into()
            })
        },
    );
}

/// Checked construction from script-supplied fields. Out-of-range values,
/// including anything that does not fit the calendar field types, are
/// rejected rather than wrapped.
fn calendar_fields(
    year: INT,
    month: INT,
    day: INT,
    hour: INT,
    minute: INT,
    second: INT,
) -> Option<NaiveDateTime> {
    let date = NaiveDate::from_ymd_opt(
        i32::try_from(year).ok()?,
        u32::try_from(month).ok()?,
        u32::try_from(day).ok()?,
    )?;
    date.and_hms_opt(
        u32::try_from(hour).ok()?,
        u32::try_from(minute).ok()?,
        u32::try_from(second).ok()?,
    )
}
