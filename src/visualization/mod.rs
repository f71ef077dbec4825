pub mod kepsim_vis2d;
