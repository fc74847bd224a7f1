use ak_mem::{Element, Matrix};

use crate::error::{FirmwareError, Result};
use crate::image::{MemoryImage, PARAM_BLOCK_BYTES};
use crate::params::{ParamBlock, ParamLayout};

/// Row-major word addressing for a square matrix stored in image memory.
#[derive(Debug, Clone, Copy)]
struct Grid {
    base: usize,
    side: usize,
}

impl Grid {
    fn addr(&self, row: usize, col: usize) -> usize {
        self.base + (row * self.side + col) * 4
    }
}

/// Element-wise product program: `r[i] = a[i] * b[i]` for the staged length.
///
/// Multiplication wraps on overflow, as the 32-bit multiply of the target
/// core does.
///
/// # Errors
///
/// Fails with an address error if the staged pointers or length walk off
/// the image.
pub fn run_vector_mul(image: &mut MemoryImage) -> Result<()> {
    let layout = ParamLayout::for_image(image);
    let params = ParamBlock::read(image, layout)?;
    let len = params.size as usize;
    for i in 0..len {
        let a = image.read_i32(params.a_ptr as usize + i * 4)?;
        let b = image.read_i32(params.b_ptr as usize + i * 4)?;
        image.write_i32(params.r_ptr as usize + i * 4, a.wrapping_mul(b))?;
    }
    Ok(())
}

/// Square matrix product program: `r = a @ b` for the staged side.
///
/// Applies the same widened multiply-accumulate rule as the tiled kernels,
/// narrowing each finished sum as it is stored, and addresses the operands
/// through explicit row-major strides.
///
/// # Errors
///
/// Fails with an address error if the staged pointers or side walk off the
/// image.
pub fn run_matrix_mul(image: &mut MemoryImage) -> Result<()> {
    let layout = ParamLayout::for_image(image);
    let params = ParamBlock::read(image, layout)?;
    let side = params.size as usize;
    let a = Grid {
        base: params.a_ptr as usize,
        side,
    };
    let b = Grid {
        base: params.b_ptr as usize,
        side,
    };
    let r = Grid {
        base: params.r_ptr as usize,
        side,
    };
    for i in 0..side {
        for j in 0..side {
            let mut sum = <i32 as Element>::acc_zero();
            for p in 0..side {
                let x = image.read_i32(a.addr(i, p))?;
                let y = image.read_i32(b.addr(p, j))?;
                sum = <i32 as Element>::mul_acc(sum, x, y);
            }
            image.write_i32(r.addr(i, j), <i32 as Element>::narrow(sum))?;
        }
    }
    Ok(())
}

/// Pack operand regions downward from the parameter block: A highest, then
/// B, then the result region.
fn pack_regions(image_len: usize, sizes: [usize; 3]) -> Result<[usize; 3]> {
    let needed = PARAM_BLOCK_BYTES + sizes.iter().sum::<usize>();
    if needed > image_len {
        return Err(FirmwareError::ImageSize {
            len: image_len,
            min: needed,
        });
    }
    let a = image_len - PARAM_BLOCK_BYTES - sizes[0];
    let b = a - sizes[1];
    let r = b - sizes[2];
    Ok([a, b, r])
}

fn write_region(image: &mut MemoryImage, base: usize, values: &[i32]) -> Result<()> {
    for (i, &value) in values.iter().enumerate() {
        image.write_i32(base + i * 4, value)?;
    }
    Ok(())
}

fn read_region(image: &MemoryImage, base: usize, len: usize) -> Result<Vec<i32>> {
    let mut out = Vec::with_capacity(len);
    for i in 0..len {
        out.push(image.read_i32(base + i * 4)?);
    }
    Ok(out)
}

/// Stage an element-wise multiply: write the parameter block and both
/// operand vectors into `image`.
///
/// # Errors
///
/// Returns `FirmwareError::OperandShape` if the vectors differ in length,
/// or `ImageSize` if the operands do not fit below the parameter block.
pub fn stage_vector_mul(image: &mut MemoryImage, a: &[i32], b: &[i32]) -> Result<()> {
    if a.len() != b.len() {
        return Err(FirmwareError::OperandShape {
            a_rows: 1,
            a_cols: a.len(),
            b_rows: 1,
            b_cols: b.len(),
        });
    }
    let nbytes = a.len() * 4;
    let [a_ptr, b_ptr, r_ptr] = pack_regions(image.len(), [nbytes, nbytes, nbytes])?;
    let layout = ParamLayout::for_image(image);
    ParamBlock {
        size: a.len() as u32,
        a_ptr: a_ptr as u32,
        b_ptr: b_ptr as u32,
        r_ptr: r_ptr as u32,
    }
    .write(image, layout)?;
    write_region(image, a_ptr, a)?;
    write_region(image, b_ptr, b)?;
    Ok(())
}

/// Read back the result vector of a staged element-wise multiply.
///
/// # Errors
///
/// Fails with an address error if the image does not hold a staged run.
pub fn read_result_vector(image: &MemoryImage) -> Result<Vec<i32>> {
    let layout = ParamLayout::for_image(image);
    let params = ParamBlock::read(image, layout)?;
    read_region(image, params.r_ptr as usize, params.size as usize)
}

/// Stage a square matrix multiply: write the parameter block and both
/// operand matrices into `image`.
///
/// # Errors
///
/// Returns `FirmwareError::OperandShape` unless both operands are square
/// with equal side, or `ImageSize` if they do not fit below the parameter
/// block.
pub fn stage_matrix_mul(image: &mut MemoryImage, a: &Matrix<i32>, b: &Matrix<i32>) -> Result<()> {
    if a.rows() != a.cols() || b.rows() != b.cols() || a.rows() != b.rows() {
        return Err(FirmwareError::OperandShape {
            a_rows: a.rows(),
            a_cols: a.cols(),
            b_rows: b.rows(),
            b_cols: b.cols(),
        });
    }
    let side = a.rows();
    let nbytes = side * side * 4;
    let [a_ptr, b_ptr, r_ptr] = pack_regions(image.len(), [nbytes, nbytes, nbytes])?;
    let layout = ParamLayout::for_image(image);
    ParamBlock {
        size: side as u32,
        a_ptr: a_ptr as u32,
        b_ptr: b_ptr as u32,
        r_ptr: r_ptr as u32,
    }
    .write(image, layout)?;
    write_region(image, a_ptr, a.as_slice())?;
    write_region(image, b_ptr, b.as_slice())?;
    Ok(())
}

/// Read back the result matrix of a staged matrix multiply.
///
/// # Errors
///
/// Fails with an address error if the image does not hold a staged run.
pub fn read_result_matrix(image: &MemoryImage) -> Result<Matrix<i32>> {
    let layout = ParamLayout::for_image(image);
    let params = ParamBlock::read(image, layout)?;
    let side = params.size as usize;
    let data = read_region(image, params.r_ptr as usize, side * side)?;
    Ok(Matrix::from_vec(data, side, side)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ak_gemm::{multiply, TileConfig};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_vector_mul_end_to_end() {
        let mut image = MemoryImage::with_default_size();
        stage_vector_mul(&mut image, &[1, 2, 3, 4], &[5, 6, 7, 8]).unwrap();
        run_vector_mul(&mut image).unwrap();
        assert_eq!(read_result_vector(&image).unwrap(), vec![5, 12, 21, 32]);
    }

    #[test]
    fn test_vector_mul_wraps() {
        let mut image = MemoryImage::new(1024).unwrap();
        stage_vector_mul(&mut image, &[i32::MAX, -7], &[2, 0]).unwrap();
        run_vector_mul(&mut image).unwrap();
        assert_eq!(
            read_result_vector(&image).unwrap(),
            vec![i32::MAX.wrapping_mul(2), 0]
        );
    }

    #[test]
    fn test_vector_mul_length_mismatch() {
        let mut image = MemoryImage::new(1024).unwrap();
        let err = stage_vector_mul(&mut image, &[1, 2], &[1, 2, 3]).unwrap_err();
        assert!(matches!(err, FirmwareError::OperandShape { .. }));
    }

    #[test]
    fn test_matrix_mul_end_to_end() {
        let a = Matrix::from_vec(vec![1, 2, 3, 4], 2, 2).unwrap();
        let b = Matrix::from_vec(vec![5, 6, 7, 8], 2, 2).unwrap();
        let mut image = MemoryImage::with_default_size();
        stage_matrix_mul(&mut image, &a, &b).unwrap();
        run_matrix_mul(&mut image).unwrap();
        let r = read_result_matrix(&image).unwrap();
        assert_eq!(r.as_slice(), &[19, 22, 43, 50]);
    }

    #[test]
    fn test_matrix_mul_identity() {
        let data: Vec<i32> = (1..=16).collect();
        let a = Matrix::from_vec(data, 4, 4).unwrap();
        let id: Matrix<i32> = Matrix::identity(4);
        let mut image = MemoryImage::with_default_size();
        stage_matrix_mul(&mut image, &a, &id).unwrap();
        run_matrix_mul(&mut image).unwrap();
        assert_eq!(read_result_matrix(&image).unwrap(), a);
    }

    #[test]
    fn test_matrix_mul_matches_tiled_kernel() {
        let mut rng = StdRng::seed_from_u64(23);
        let side = 8;
        let data_a: Vec<i32> = (0..side * side).map(|_| rng.gen_range(-50..50)).collect();
        let data_b: Vec<i32> = (0..side * side).map(|_| rng.gen_range(-50..50)).collect();
        let a = Matrix::from_vec(data_a, side, side).unwrap();
        let b = Matrix::from_vec(data_b, side, side).unwrap();

        let mut image = MemoryImage::with_default_size();
        stage_matrix_mul(&mut image, &a, &b).unwrap();
        run_matrix_mul(&mut image).unwrap();
        let firmware = read_result_matrix(&image).unwrap();

        let tiled = multiply(&a.view(), &b.view(), &TileConfig::new(9).unwrap()).unwrap();
        assert_eq!(firmware.as_slice(), tiled.as_slice());
    }

    #[test]
    fn test_stage_rejects_non_square() {
        let a: Matrix<i32> = Matrix::zeros(2, 3);
        let b: Matrix<i32> = Matrix::zeros(3, 3);
        let mut image = MemoryImage::with_default_size();
        assert!(matches!(
            stage_matrix_mul(&mut image, &a, &b),
            Err(FirmwareError::OperandShape {
                a_rows: 2,
                a_cols: 3,
                ..
            })
        ));
    }

    #[test]
    fn test_stage_rejects_mismatched_sides() {
        let a: Matrix<i32> = Matrix::zeros(2, 2);
        let b: Matrix<i32> = Matrix::zeros(3, 3);
        let mut image = MemoryImage::with_default_size();
        assert!(matches!(
            stage_matrix_mul(&mut image, &a, &b),
            Err(FirmwareError::OperandShape { .. })
        ));
    }

    #[test]
    fn test_stage_rejects_oversized_operands() {
        // A 1 KiB image holds 84 words per region; 100-element vectors do
        // not fit.
        let mut image = MemoryImage::new(1024).unwrap();
        let a = vec![1; 100];
        let b = vec![2; 100];
        let err = stage_vector_mul(&mut image, &a, &b).unwrap_err();
        assert!(matches!(
            err,
            FirmwareError::ImageSize {
                len: 1024,
                min: 1216,
            }
        ));
    }

    #[test]
    fn test_staged_layout_packs_downward() {
        let mut image = MemoryImage::new(1024).unwrap();
        stage_vector_mul(&mut image, &[1, 2], &[3, 4]).unwrap();
        let layout = ParamLayout::for_image(&image);
        let params = ParamBlock::read(&image, layout).unwrap();
        assert_eq!(params.size, 2);
        // A sits just below the parameter block, then B, then the result.
        assert_eq!(params.a_ptr, 1024 - 16 - 8);
        assert_eq!(params.b_ptr, 1024 - 16 - 16);
        assert_eq!(params.r_ptr, 1024 - 16 - 24);
    }

    #[test]
    fn test_image_file_round_trip_runs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("staged.bin");
        let a = Matrix::from_vec(vec![1, 0, 0, 2], 2, 2).unwrap();
        let b = Matrix::from_vec(vec![3, 4, 5, 6], 2, 2).unwrap();

        let mut image = MemoryImage::with_default_size();
        stage_matrix_mul(&mut image, &a, &b).unwrap();
        image.save(&path).unwrap();

        let mut loaded = MemoryImage::from_file(&path).unwrap();
        run_matrix_mul(&mut loaded).unwrap();
        let r = read_result_matrix(&loaded).unwrap();
        assert_eq!(r.as_slice(), &[3, 4, 10, 12]);
    }
}
