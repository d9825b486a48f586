//! Start-up routine, run at login or by hand.

use anyhow::Result;

use crate::{config::Context, startup};

pub fn run(ctx: &mut Context) -> Result<()> {
    let launch = startup::run(ctx)?;

    if launch.first_launch {
        println!("First launch: fastpass will start at login.");
    }
    if let Some(pwd) = launch.password {
        println!("{}", pwd);
    }

    Ok(())
}
