mod config_files;
mod nominal;
mod operator_override;
mod rig;
mod sensor_fault;
